// Asset layout is fixed: images/ezgif-frame-001.jpg .. ezgif-frame-040.jpg
pub const FRAME_COUNT: usize = 40;

const FRAME_DIR: &str = "images";
const FRAME_PREFIX: &str = "ezgif-frame-";
const FRAME_EXTENSION: &str = "jpg";

/// Path of the frame at zero-based `index`; file names count from 1
pub fn frame_path(index: usize) -> String {
    format!(
        "{}/{}{:03}.{}",
        FRAME_DIR,
        FRAME_PREFIX,
        index + 1,
        FRAME_EXTENSION
    )
}

pub fn frame_paths() -> impl Iterator<Item = String> {
    (0..FRAME_COUNT).map(frame_path)
}
