pub mod image_helper {
    use image::ImageEncoder;

    /// Dumps an interleaved RGB buffer to a PNG file. Diagnostic utility for
    /// tests and host-side debugging; the engine core never touches disk.
    pub fn save(
        name: String,
        width: u32,
        height: u32,
        buffer: &[u8],
    ) -> Result<(), image::error::ImageError> {
        let output = std::fs::File::create(name)?;
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(buffer, width, height, image::ExtendedColorType::Rgb8)?;

        Ok(())
    }
}
