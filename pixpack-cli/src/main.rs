use argh::FromArgs;
use batch::{BatchOptions, DepthOverride, DepthPlan};
use pixpack::{
    utils::{variable_name, DEFAULT_THRESHOLD},
    ArrayLiteral, BitDepth, PixelGrid, Unpacked,
};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

mod batch;
mod source;

/// Converts images into packed 1-bit or 2-bit C arrays.
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Batch(Batch),
    Convert(Convert),
}

/// Converts every image in a directory, writing one `<name>_<depth>bit.c` file per image.
#[derive(FromArgs)]
#[argh(subcommand, name = "batch")]
struct Batch {
    /// directory to read images from
    #[argh(option, default = "PathBuf::from(\"source\")")]
    source: PathBuf,

    /// directory to write the generated files to, created if missing
    #[argh(option, default = "PathBuf::from(\"converted\")")]
    dest: PathBuf,

    /// bit depth (1 or 2) for all images. Images without a depth are asked for interactively.
    #[argh(option)]
    depth: Option<BitDepth>,

    /// bit depth for a single image, as `<file name>=<1|2>`. May be repeated.
    #[argh(option)]
    depth_for: Vec<DepthOverride>,

    /// luma levels above this are "on" at 1 bit per pixel (default 128)
    #[argh(option, default = "DEFAULT_THRESHOLD")]
    threshold: u8,
}

/// Converts a single image.
#[derive(FromArgs)]
#[argh(subcommand, name = "convert")]
struct Convert {
    /// bit depth, 1 or 2
    #[argh(option)]
    depth: BitDepth,

    /// variable name, defaults to the input file name without extension
    #[argh(option)]
    name: Option<String>,

    /// luma levels above this are "on" at 1 bit per pixel (default 128)
    #[argh(option, default = "DEFAULT_THRESHOLD")]
    threshold: u8,

    /// print a text preview of the packed pixels
    #[argh(switch)]
    preview: bool,

    /// the input image (png, jpg, bmp, gif)
    #[argh(positional)]
    input: PathBuf,
    /// the output file, `-` for stdout
    #[argh(positional)]
    output: String,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Cli { command } = argh::from_env();

    match command {
        Command::Batch(options) => batch(options),
        Command::Convert(options) => convert(options),
    }
}

fn batch(options: Batch) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let Batch {
        source,
        dest,
        depth,
        depth_for,
        threshold,
    } = options;

    let options = BatchOptions {
        source,
        dest,
        threshold,
        plan: DepthPlan::new(depth, depth_for),
    };

    let summary = batch::run(&options, &mut io::stdin().lock(), &mut io::stdout())?;
    if summary.found == 0 {
        return Ok(ExitCode::SUCCESS);
    }

    if summary.failed > 0 {
        log::error!(
            "{} of {} image(s) could not be converted",
            summary.failed,
            summary.found
        );
        return Ok(ExitCode::FAILURE);
    }

    println!(
        "\nAll done! Converted {} of {} image(s).",
        summary.converted, summary.found
    );
    Ok(ExitCode::SUCCESS)
}

fn convert(options: Convert) -> Result<ExitCode, Box<dyn std::error::Error>> {
    convert_image(&options, &mut io::stdout().lock(), &mut io::stderr().lock())?;
    Ok(ExitCode::SUCCESS)
}

/// Converts `options.input`, writing the literal (for `-`) or a status line to `out` and the
/// preview, if asked for, to `preview_out`.
fn convert_image<W: Write, P: Write>(
    options: &Convert,
    out: &mut W,
    preview_out: &mut P,
) -> Result<(), Box<dyn std::error::Error>> {
    let Convert {
        depth,
        name,
        threshold,
        preview,
        input,
        output,
    } = options;
    let depth = *depth;

    let image = source::load(input, depth, *threshold)?;
    let (width, height) = (image.width() as usize, image.height() as usize);
    let grid = PixelGrid::new(width, height, image.as_raw())?;
    let packed = grid.pack(depth);

    let name = match name {
        Some(name) => name.clone(),
        None => variable_name(&input.file_stem().unwrap_or_default().to_string_lossy()),
    };
    let literal = ArrayLiteral::new(&name, depth, &packed);

    if *preview {
        print_preview(&packed, depth, width, height, preview_out)?;
    }

    if output == "-" {
        literal.write_to(&mut *out)?;
    } else {
        batch::write_atomic(Path::new(output), &literal)?;
        writeln!(
            out,
            "Written {width}x{height} image as {} bytes to `{output}`",
            packed.len()
        )?;
    }

    Ok(())
}

/// Renders packed pixels as text, one character per pixel.
fn print_preview<W: Write>(
    packed: &[u8],
    depth: BitDepth,
    width: usize,
    height: usize,
    w: &mut W,
) -> io::Result<()> {
    const SHADES_1BIT: [char; 2] = ['.', '#'];
    const SHADES_2BIT: [char; 4] = [' ', '░', '▒', '█'];

    if width == 0 {
        return Ok(());
    }

    let shade = |value: u8| match depth {
        BitDepth::One => SHADES_1BIT[usize::from(value)],
        BitDepth::Two => SHADES_2BIT[usize::from(value)],
    };

    let values: Vec<u8> = Unpacked::new(packed, depth).take(width * height).collect();
    for row in values.chunks(width) {
        let line: String = row.iter().map(|&value| shade(value)).collect();
        writeln!(w, "{line}")?;
    }

    Ok(())
}
