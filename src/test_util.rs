#[cfg(test)]
pub(crate) fn write_png(
    dir: &std::path::Path,
    name: &str,
    width: u32,
    height: u32,
    rgb: [u8; 3],
) -> std::path::PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(&path)
        .expect("write png");
    path
}

#[cfg(test)]
pub(crate) fn write_quiz(dir: &std::path::Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("quiz.txt");
    std::fs::write(&path, text).expect("write quiz");
    path
}
