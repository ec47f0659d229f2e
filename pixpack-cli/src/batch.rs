use crate::source::{self, SourceError};
use pixpack::{
    emit::EmitError,
    utils::{is_supported_extension, output_file_name, variable_name},
    ArrayLiteral, BitDepth, GridError, PixelGrid,
};
use snafu::{ResultExt, Snafu};
use std::{
    collections::HashMap,
    fs,
    io::{self, BufRead, BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};
use tempfile::NamedTempFile;

#[derive(Debug, Snafu)]
pub enum BatchError {
    #[snafu(display("Failed to read directory `{}`: {source}", path.display()))]
    ReadDir { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to create directory `{}`: {source}", path.display()))]
    CreateDir { path: PathBuf, source: io::Error },
    #[snafu(display("{source}"))]
    Source { source: SourceError },
    #[snafu(display("Invalid pixel grid for `{}`: {source}", path.display()))]
    Grid { path: PathBuf, source: GridError },
    #[snafu(display("Failed to write `{}`: {source}", path.display()))]
    Write { path: PathBuf, source: EmitError },
    #[snafu(display("Failed to write `{}`: {source}", path.display()))]
    Io { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to read bit depth: {source}"))]
    Prompt { source: io::Error },
    #[snafu(display("Failed to write progress output: {source}"))]
    Output { source: io::Error },
}

/// `<file name>=<depth>`, e.g. `logo.png=2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthOverride {
    pub file: String,
    pub depth: BitDepth,
}

impl FromStr for DepthOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((file, depth)) = s.rsplit_once('=') else {
            return Err(format!("expected `<file>=<1|2>`, got `{s}`"));
        };
        if file.is_empty() {
            return Err(format!("missing file name in `{s}`"));
        }
        let depth = depth.parse().map_err(|e| format!("{e} (in `{s}`)"))?;

        Ok(DepthOverride {
            file: file.to_owned(),
            depth,
        })
    }
}

/// Which bit depth every file gets. Files without an entry are asked for interactively.
#[derive(Debug, Clone, Default)]
pub struct DepthPlan {
    global: Option<BitDepth>,
    per_file: HashMap<String, BitDepth>,
}

impl DepthPlan {
    pub fn new(global: Option<BitDepth>, overrides: impl IntoIterator<Item = DepthOverride>) -> Self {
        Self {
            global,
            per_file: overrides
                .into_iter()
                .map(|DepthOverride { file, depth }| (file, depth))
                .collect(),
        }
    }

    pub fn resolve(&self, file_name: &str) -> Option<BitDepth> {
        self.per_file.get(file_name).copied().or(self.global)
    }

    fn overridden_files(&self) -> impl Iterator<Item = &str> {
        self.per_file.keys().map(String::as_str)
    }
}

pub struct BatchOptions {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub threshold: u8,
    pub plan: DepthPlan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub found: usize,
    pub converted: usize,
    pub failed: usize,
}

/// Supported images directly inside `dir`, sorted by file name.
pub fn find_images(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir).context(ReadDirSnafu { path: dir })? {
        let path = entry.context(ReadDirSnafu { path: dir })?.path();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(is_supported_extension);
        if supported && path.is_file() {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

/// Asks for a bit depth until a valid one is entered.
pub fn prompt_depth<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<BitDepth> {
    let mut line = String::new();
    loop {
        write!(output, "  Convert to [1] 1-bit or [2] 2-bit array? Enter 1 or 2: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a bit depth was entered",
            ));
        }

        match line.parse::<BitDepth>() {
            Ok(depth) => return Ok(depth),
            Err(e) => {
                log::debug!("Rejected bit depth {:?}: {e}", line.trim());
                writeln!(output, "  Invalid input. Please enter 1 or 2.")?;
            }
        }
    }
}

/// Converts one image and writes `<name>_<depth>bit.c` into `dest`.
///
/// Returns the path written and the array length.
pub fn convert_file(
    path: &Path,
    depth: BitDepth,
    name: &str,
    threshold: u8,
    dest: &Path,
) -> Result<(PathBuf, usize), BatchError> {
    let image = source::load(path, depth, threshold).context(SourceSnafu)?;
    let grid = PixelGrid::new(image.width() as usize, image.height() as usize, image.as_raw())
        .context(GridSnafu { path })?;
    let packed = grid.pack(depth);

    let output = dest.join(output_file_name(name, depth));
    write_atomic(&output, &ArrayLiteral::new(name, depth, &packed))?;

    Ok((output, packed.len()))
}

/// Writes the literal to a fresh temporary file next to `path` and renames it into place, so
/// `path` is either complete or untouched.
pub fn write_atomic(path: &Path, literal: &ArrayLiteral<'_>) -> Result<(), BatchError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).context(IoSnafu { path })?;

    let mut w = BufWriter::new(tmp);
    literal.write_to(&mut w).context(WriteSnafu { path })?;
    let tmp = w
        .into_inner()
        .map_err(io::IntoInnerError::into_error)
        .context(IoSnafu { path })?;
    tmp.as_file().sync_all().context(IoSnafu { path })?;

    tmp.persist(path)
        .map_err(|e| e.error)
        .context(IoSnafu { path })?;
    Ok(())
}

/// Converts every supported image in `options.source`.
///
/// Files that fail to convert are reported and skipped. Depths missing from the plan are read
/// from `input`.
pub fn run<R: BufRead, W: Write>(
    options: &BatchOptions,
    input: &mut R,
    output: &mut W,
) -> Result<BatchSummary, BatchError> {
    let BatchOptions {
        source,
        dest,
        threshold,
        plan,
    } = options;

    let images = find_images(source)?;
    let mut summary = BatchSummary {
        found: images.len(),
        ..BatchSummary::default()
    };

    if images.is_empty() {
        writeln!(output, "No images found in '{}' folder.", source.display())
            .context(OutputSnafu)?;
        return Ok(summary);
    }

    fs::create_dir_all(dest).context(CreateDirSnafu { path: dest })?;

    let file_names: Vec<String> = images
        .iter()
        .map(|path| path.file_name().unwrap_or_default().to_string_lossy().into_owned())
        .collect();

    for file in plan.overridden_files() {
        if !file_names.iter().any(|name| name == file) {
            log::warn!("Bit depth given for `{file}`, but no such image in `{}`", source.display());
        }
    }

    writeln!(output, "Batch Image to C Array Converter").context(OutputSnafu)?;
    writeln!(output, "===============================").context(OutputSnafu)?;
    writeln!(output, "Found {} image(s) in '{}':", images.len(), source.display())
        .context(OutputSnafu)?;
    for (idx, file_name) in file_names.iter().enumerate() {
        writeln!(output, "  [{}] {file_name}", idx + 1).context(OutputSnafu)?;
    }
    if file_names.iter().any(|name| plan.resolve(name).is_none()) {
        writeln!(
            output,
            "\nFor each image without a bit depth, you will be prompted to choose 1 or 2."
        )
        .context(OutputSnafu)?;
    }

    for (path, file_name) in images.iter().zip(&file_names) {
        writeln!(output, "\nProcessing: {file_name}").context(OutputSnafu)?;

        let depth = match plan.resolve(file_name) {
            Some(depth) => {
                writeln!(output, "  Using {depth}-bit").context(OutputSnafu)?;
                depth
            }
            None => prompt_depth(input, output).context(PromptSnafu)?,
        };

        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        let name = variable_name(&stem);

        match convert_file(path, depth, &name, *threshold, dest) {
            Ok((written, len)) => {
                writeln!(output, "  Saved: {} ({len} bytes)", written.display())
                    .context(OutputSnafu)?;
                summary.converted += 1;
            }
            Err(e) => {
                log::error!("Skipping `{file_name}`: {e}");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
