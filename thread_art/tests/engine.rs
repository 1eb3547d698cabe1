use std::{collections::BTreeMap, time::Duration};

use image::{DynamicImage, Rgb, RgbImage};
use palette::Srgb;
use thread_art::{
    geometry::Point,
    indicators,
    selector,
    thread::{repartition, Threads},
    verboser::{Message, Silent},
    Capabilities, Channel, Compositing, Error, Grid, Growth, Mode, Overrides, Parameters, Renderer, Shape, Thread,
    ThreadArt,
};

const FOREVER: Duration = Duration::from_secs(600);

fn portrait() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(96, 64, |x, y| {
        let dx = x as f64 - 40.0;
        let dy = y as f64 - 30.0;
        let disc = (dx * dx + dy * dy).sqrt() < 18.0;
        Rgb([
            if disc { 30 } else { (x * 2) as u8 },
            (y * 3) as u8,
            if disc { 200 } else { 90 },
        ])
    }))
}

fn parameters(seed: u64) -> Parameters {
    Parameters {
        pegs_count: 64,
        nb_lines: 120,
        line_opacity: 0.25,
        seed: Some(seed),
        ..Default::default()
    }
}

fn grow_to_target<S: thread_art::Float>(art: &mut ThreadArt<S>) {
    while art.grow_by(FOREVER, &mut Silent).unwrap() == Growth::Worked {}
}

#[test]
fn rejects_empty_images() {
    let result = ThreadArt::<f32>::new(DynamicImage::new_rgb8(0, 12), Parameters::default());
    assert!(matches!(result, Err(Error::InvalidImage { width: 0, height: 12 })));
}

#[test]
fn eight_pegs_one_line_on_gray_draws_a_single_valid_segment() {
    let gray = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([128; 3])));
    let mut art = ThreadArt::<f64>::new(
        gray,
        Parameters {
            pegs_count: 8,
            nb_lines: 1,
            seed: Some(5),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(art.grow_by(FOREVER, &mut Silent).unwrap(), Growth::Worked);
    let sequence = art.threads().sequence(Channel::Monochrome).to_vec();
    assert_eq!(sequence.len(), 2);
    assert!(sequence.iter().all(|&peg| peg < 8));
    assert!(!art.pegs().too_close(sequence[0], sequence[1]));
    assert_eq!(art.total_segments(), 1);
}

#[test]
fn growing_at_target_is_idle() {
    let mut art = ThreadArt::<f32>::new(portrait(), parameters(1)).unwrap();
    grow_to_target(&mut art);
    let sequence = art.threads().sequence(Channel::Monochrome).to_vec();
    let stats = art.stats();
    for _ in 0..3 {
        assert_eq!(art.grow_by(FOREVER, &mut Silent).unwrap(), Growth::Idle);
    }
    assert_eq!(art.threads().sequence(Channel::Monochrome), sequence.as_slice());
    assert_eq!(art.stats(), stats);
    assert!(art.is_complete());
}

#[test]
fn truncation_replays_the_same_buffer() {
    for mode in [Mode::Monochrome, Mode::Trichromatic] {
        let mut art = ThreadArt::<f64>::new(
            portrait(),
            Parameters {
                mode,
                nb_lines: 200,
                ..parameters(11)
            },
        )
        .unwrap();
        grow_to_target(&mut art);
        let at_200 = art.stats();
        let planes = art.raster().planes().to_vec();

        art.set_nb_lines(300);
        grow_to_target(&mut art);
        assert_eq!(art.total_segments(), 300);
        assert_ne!(art.stats(), at_200);

        art.set_nb_lines(200);
        let mut messages = Vec::new();
        let growth = art.grow_by(FOREVER, &mut |message: Message| messages.push(message)).unwrap();
        assert_eq!(growth, Growth::Worked);
        assert_eq!(messages[0], Message::Truncating(200));
        assert_eq!(art.total_segments(), 200);
        assert_eq!(art.stats(), at_200, "{mode:?}");
        assert!(art.raster().planes() == planes.as_slice());
    }
}

#[test]
fn trichromatic_counts_follow_repartition() {
    let mut art = ThreadArt::<f32>::new(
        portrait(),
        Parameters {
            mode: Mode::Trichromatic,
            nb_lines: 90,
            ..parameters(3)
        },
    )
    .unwrap();
    let Threads::Trichromatic(thread) = art.threads() else {
        panic!("expected trichromatic threads");
    };
    let frequencies = thread.frequencies();
    assert!((frequencies.iter().sum::<f64>() - 1.0).abs() < 1e-9);

    while art.grow_by(Duration::ZERO, &mut Silent).unwrap() == Growth::Worked {
        let Threads::Trichromatic(thread) = art.threads() else {
            unreachable!()
        };
        assert_eq!(thread.counts(), repartition(art.total_segments(), frequencies));
    }
    assert_eq!(art.total_segments(), 90);

    art.set_nb_lines(37);
    art.grow_by(FOREVER, &mut Silent).unwrap();
    let Threads::Trichromatic(thread) = art.threads() else {
        unreachable!()
    };
    assert_eq!(thread.counts(), repartition(37, frequencies));
}

#[test]
fn exhausted_budget_still_adds_one_segment_per_call() {
    for mode in [Mode::Monochrome, Mode::Trichromatic] {
        let mut art = ThreadArt::<f32>::new(portrait(), Parameters { mode, ..parameters(8) }).unwrap();
        for expected in 1..=12 {
            let mut grown = Vec::new();
            let growth = art
                .grow_by(Duration::ZERO, &mut |message: Message| {
                    if let Message::Growing(total) = message {
                        grown.push(total);
                    }
                })
                .unwrap();
            assert_eq!(growth, Growth::Worked);
            assert_eq!(art.total_segments(), expected);
            assert_eq!(grown, [expected]);
        }
    }
}

#[test]
fn consecutive_pegs_are_never_too_close() {
    for shape in [Shape::Circle, Shape::Rectangle] {
        for mode in [Mode::Monochrome, Mode::Trichromatic] {
            let mut art = ThreadArt::<f32>::new(
                portrait(),
                Parameters {
                    shape,
                    mode,
                    nb_lines: 150,
                    ..parameters(21)
                },
            )
            .unwrap();
            grow_to_target(&mut art);
            for &channel in art.threads().channels() {
                for pair in art.threads().sequence(channel).windows(2) {
                    assert_ne!(pair[0], pair[1]);
                    assert!(!art.pegs().too_close(pair[0], pair[1]), "{shape:?} {mode:?} {pair:?}");
                }
            }
        }
    }
}

#[test]
fn equal_seeds_grow_equal_threads() {
    let grow = |seed| {
        let mut art = ThreadArt::<f32>::new(portrait(), parameters(seed)).unwrap();
        grow_to_target(&mut art);
        art.threads().sequence(Channel::Monochrome).to_vec()
    };
    assert_eq!(grow(42), grow(42));
}

#[test]
fn only_layout_changes_reset_the_threads() {
    let mut art = ThreadArt::<f32>::new(portrait(), parameters(8)).unwrap();
    grow_to_target(&mut art);
    assert_eq!(art.total_segments(), 120);

    art.set_nb_lines(20);
    assert_eq!(art.total_segments(), 120);
    art.configure(&Overrides::default());
    assert_eq!(art.total_segments(), 120);

    art.configure(&Overrides {
        line_opacity: Some(0.5),
        ..Default::default()
    });
    assert_eq!(art.total_segments(), 0);
    assert_eq!(art.parameters().nb_lines, 20);
    assert_eq!(art.parameters().line_opacity, 0.5);

    art.configure(&Overrides {
        pegs_count: Some(1.0),
        ..Default::default()
    });
    assert_eq!(art.pegs().len(), 3);
}

#[test]
fn selection_failure_keeps_drawn_segments() {
    let mut art = ThreadArt::<f64>::new(
        portrait(),
        Parameters {
            pegs_count: 3,
            nb_lines: 5,
            ..parameters(0)
        },
    )
    .unwrap();
    let error = art.grow_by(FOREVER, &mut Silent).unwrap_err();
    assert!(matches!(
        error,
        Error::Selection(selector::Error::NoEligibleCandidate { pegs: 3 })
    ));
    assert_eq!(art.total_segments(), 2);
}

#[derive(Debug, PartialEq)]
enum Call {
    Clear(Srgb<u8>),
    Polyline {
        points: usize,
        color: Srgb<u8>,
        compositing: Compositing,
    },
    Points(usize),
}

struct Recorder {
    capabilities: Capabilities,
    size: Grid<f64>,
    calls: Vec<Call>,
    outside: usize,
}

impl Recorder {
    fn new(advanced_compositing: bool) -> Self {
        Self {
            capabilities: Capabilities { advanced_compositing },
            size: Grid::new(300.0, 200.0),
            calls: Vec::new(),
            outside: 0,
        }
    }

    fn check(&mut self, points: &[Point<f64>]) {
        self.outside += points
            .iter()
            .filter(|point| {
                !(-1e-6..=self.size.width + 1e-6).contains(&point.x)
                    || !(-1e-6..=self.size.height + 1e-6).contains(&point.y)
            })
            .count();
    }
}

impl Renderer<f64> for Recorder {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn size(&self) -> Grid<f64> {
        self.size
    }

    fn clear(&mut self, color: Srgb<u8>) {
        self.calls.push(Call::Clear(color));
    }

    fn draw_polyline(&mut self, points: &[Point<f64>], color: Srgb<u8>, _: f64, compositing: Compositing, _: f64) {
        self.check(points);
        self.calls.push(Call::Polyline {
            points: points.len(),
            color,
            compositing,
        });
    }

    fn draw_points(&mut self, points: &[Point<f64>], _: Srgb<u8>, _: f64) {
        self.check(points);
        self.calls.push(Call::Points(points.len()));
    }
}

#[test]
fn renderer_receives_transformed_threads() {
    let mut art = ThreadArt::<f64>::new(portrait(), parameters(4)).unwrap();
    grow_to_target(&mut art);

    let mut recorder = Recorder::new(true);
    art.draw_onto(&mut recorder);
    assert_eq!(
        recorder.calls,
        [
            Call::Clear(Srgb::new(255, 255, 255)),
            Call::Polyline {
                points: 121,
                color: Srgb::new(0, 0, 0),
                compositing: Compositing::Darken
            },
            Call::Points(64)
        ]
    );
    assert_eq!(recorder.outside, 0);

    let mut plain = Recorder::new(false);
    art.draw_onto(&mut plain);
    assert!(matches!(
        plain.calls[1],
        Call::Polyline {
            compositing: Compositing::SourceOver,
            ..
        }
    ));
}

#[test]
fn light_threads_lighten_on_black() {
    let mut art = ThreadArt::<f64>::new(
        portrait(),
        Parameters {
            mode: Mode::Trichromatic,
            invert_colors: true,
            nb_lines: 60,
            ..parameters(9)
        },
    )
    .unwrap();
    grow_to_target(&mut art);
    let mut recorder = Recorder::new(true);
    art.draw_onto(&mut recorder);
    assert_eq!(recorder.calls[0], Call::Clear(Srgb::new(0, 0, 0)));
    let polylines: Vec<_> = recorder
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::Polyline {
                points,
                compositing,
                ..
            } => Some((*points, *compositing)),
            _ => None,
        })
        .collect();
    assert!(!polylines.is_empty());
    assert!(polylines.iter().all(|&(_, compositing)| compositing == Compositing::Lighten));
    let segments: usize = polylines.iter().map(|&(points, _)| points - 1).sum();
    assert_eq!(segments, 60);
}

#[test]
fn instructions_only_for_dark_monochrome_thread() {
    let mut art = ThreadArt::<f32>::new(portrait(), Parameters { nb_lines: 10, ..parameters(2) }).unwrap();
    grow_to_target(&mut art);
    let text = art.instructions().unwrap();
    assert_eq!(text.lines().count(), 1 + 11);

    art.configure(&Overrides {
        invert_colors: Some(true),
        ..Default::default()
    });
    assert!(art.instructions().is_none());

    art.configure(&Overrides {
        invert_colors: Some(false),
        mode: Some(Mode::Trichromatic),
        ..Default::default()
    });
    assert!(art.instructions().is_none());
}

#[test]
fn indicators_are_reported_by_name() {
    let mut art = ThreadArt::<f32>::new(portrait(), Parameters { nb_lines: 30, ..parameters(6) }).unwrap();
    grow_to_target(&mut art);
    let mut sink = BTreeMap::new();
    art.report(&mut sink);

    let keys: Vec<_> = sink.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            indicators::ERROR_AVERAGE,
            indicators::ERROR_MEAN_SQUARE,
            indicators::ERROR_VARIANCE,
            indicators::PEGS,
            indicators::SEGMENTS,
        ]
    );
    assert_eq!(sink[indicators::PEGS], 64.0);
    assert_eq!(sink[indicators::SEGMENTS], 30.0);
    assert!(sink[indicators::ERROR_MEAN_SQUARE] >= sink[indicators::ERROR_AVERAGE].powi(2) - 1e-3);
}
