use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub fn write_rgb_png(
    output: &Path,
    cols: usize,
    rows: usize,
    rgb_data: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(output)?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, cols as u32, rows as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(rgb_data)?;
    Ok(())
}
