// This file is an example of how to use the `personalens` library.
// The main library entry point is `src/lib.rs`.

fn main() {
    println!("PersonaLens Engine - Example Runner");
    // In a real application, you would create a pipeline, feed it the
    // user's favorite photos, and enhance new captures with it.
    //
    // Example:
    // let mut pipeline = PersonalizationPipeline::new();
    // pipeline.add_favorite(&frame, width, height, chosen_params)?;
    // let processed = pipeline.process_image(&new_frame, width, height)?;
    // display(processed.pixels);
}
