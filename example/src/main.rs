use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use quantise::{Image, IndexedImage, Options};

struct Decoded {
    bytes: Vec<u8>,
    width: usize,
    height: usize,
    rgba: bool,
}

fn load_image(path: &str) -> Result<Decoded, Box<dyn std::error::Error>> {
    let mut decoder = png::Decoder::new(File::open(path)?);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    let rgba = match info.color_type {
        png::ColorType::Rgb => false,
        png::ColorType::Rgba => true,
        other => return Err(format!("unsupported color type {:?}", other).into()),
    };

    buf.truncate(info.buffer_size());

    Ok(Decoded {
        bytes: buf,
        width: info.width as usize,
        height: info.height as usize,
        rgba,
    })
}

fn save_image(path: &str, indexed: &IndexedImage) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(Path::new(path))?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, indexed.width as u32, indexed.height as u32);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(indexed.palette.to_rgb_bytes());
    let mut writer = encoder.write_header()?;

    writer.write_image_data(&indexed.indexes)?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 4 {
        println!("Usage: quantise_demo <colors> <src_path> <dst_path>");
        std::process::exit(1)
    }

    let colors = args[1].parse::<usize>()?;
    let src_path = &args[2];
    let dst_path = &args[3];

    let decoded = load_image(src_path)?;
    log::info!("loaded {} ({}x{})", src_path, decoded.width, decoded.height);

    let image = match decoded.rgba {
        true => Image::new_rgba(&decoded.bytes, decoded.width, decoded.height)?,
        false => Image::new(&decoded.bytes, decoded.width, decoded.height)?,
    };

    let opts = Options::new(colors)?;
    let indexed = IndexedImage::new(&image, &opts)?;
    log::info!("quantised to {} colors", indexed.palette.count);

    save_image(dst_path, &indexed)
}
