use std::{fs, time::Duration};

use image::{DynamicImage, Rgb, RgbImage};
use thread_art::{verboser::Silent, Growth, Parameters, SvgRenderer, ThreadArt};

fn main() {
    let rings = RgbImage::from_fn(400, 400, |x, y| {
        let dx = x as f32 - 200.0;
        let dy = y as f32 - 200.0;
        let level = (((dx * dx + dy * dy).sqrt() / 12.0).sin() * 127.0 + 128.0) as u8;
        Rgb([level; 3])
    });
    let mut art = ThreadArt::<f32>::new(
        DynamicImage::ImageRgb8(rings),
        Parameters {
            pegs_count: 200,
            nb_lines: 0,
            seed: Some(1),
            ..Default::default()
        },
    )
    .unwrap();

    let out = std::env::temp_dir().join("thread_art_rings");
    fs::create_dir_all(&out).unwrap();
    for step in 1..=8 {
        art.set_nb_lines(step * 250);
        while art.grow_by(Duration::from_millis(100), &mut Silent).unwrap() == Growth::Worked {}
        let mut renderer = SvgRenderer::new(800.0, 800.0);
        art.draw_onto(&mut renderer);
        renderer.save(out.join(format!("rings_{step}.svg"))).unwrap();
        fs::write(out.join(format!("rings_{step}.txt")), art.instructions().unwrap()).unwrap();
        println!("{} segments, error average {:.2}", art.total_segments(), art.stats().average);
    }
}
