use clap::Parser;
use gx_texdec::TPL;
use std::error::Error;
use std::io::Cursor;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input .tpl file(s); patterns containing `*` are expanded.
    #[arg(required = true)]
    pub inputs: Vec<String>,
    /// Output file. Ignored when the inputs expand to more than one file;
    /// multi-image archives get the image index appended to the stem.
    #[arg(short)]
    pub output: Option<PathBuf>,
    /// Print the container headers instead of converting.
    #[arg(long)]
    pub info: bool,
}

fn numbered(path: &Path, index: usize) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let ext = match path.extension() {
        Some(ext) => ext.to_string_lossy().into_owned(),
        None => String::from("png"),
    };
    path.with_file_name(format!("{stem}_{index}.{ext}"))
}

fn single_output(output: Option<PathBuf>, targets: usize) -> Option<PathBuf> {
    if targets == 1 { output } else { None }
}

fn print_info(input: &Path, tpl: &TPL) {
    println!("{}: {} image(s)", input.display(), tpl.header.image_count);
    for (index, node) in tpl.nodes.iter().enumerate() {
        let img = node.image_header;
        println!(
            "  image {index}: {}x{} {}, {} bytes at 0x{:X}",
            img.width,
            img.height,
            img.format,
            img.image_size(),
            img.image_data_offset
        );
        println!(
            "    wrap {}/{}, filter {}/{}, lod {}..{}",
            img.wrap_s, img.wrap_t, img.min_filter, img.mag_filter, img.min_lod, img.max_lod
        );
        if let Some(pal) = node.palette_header {
            println!(
                "    palette: {} {} entries at 0x{:X}",
                pal.entry_count, pal.palette_format, pal.palette_data_offset
            );
        }
    }
}

fn parse_input(input: PathBuf, output: Option<PathBuf>, info: bool) -> Result<(), Box<dyn Error>> {
    let mut cursor = Cursor::new(std::fs::read(&input)?);
    let tpl = TPL::read_info(&mut cursor)?;
    if info {
        print_info(&input, &tpl);
        return Ok(());
    }
    let output = output.unwrap_or_else(|| input.with_extension("png"));
    for index in 0..tpl.nodes.len() {
        if let Some(image) = tpl.get_image(index) {
            let path = if tpl.nodes.len() == 1 {
                output.clone()
            } else {
                numbered(&output, index)
            };
            image.save(path)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let Args { inputs, output, info } = Args::parse();
    let mut paths = Vec::new();
    for input in inputs {
        if input.contains('*') {
            paths.extend(glob::glob(&input)?.flatten());
        } else {
            paths.push(PathBuf::from(input));
        }
    }
    let output = single_output(output, paths.len());
    for path in paths {
        parse_input(path, output.clone(), info)?;
    }
    Ok(())
}
