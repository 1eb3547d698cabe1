use image::DynamicImage;
use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    geometry::Segment,
    metrics::ErrorStats,
    params::{Overrides, Parameters},
    pegs::PegTable,
    raster::{Crop, RasterBuffer, Stroke},
    selector,
    thread::{Channel, Thread, Threads},
    Float,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("source image has a zero dimension ({width}x{height})")]
    InvalidImage { width: u32, height: u32 },
    #[error(transparent)]
    Selection(#[from] selector::Error),
}

/// Greedy thread art generator over one source image.
///
/// Every layout change rebuilds pegs, buffer and threads from scratch; moving
/// only the target segment count keeps the threads so that the next
/// [`ThreadArt::grow_by`] either extends or truncates them.
pub struct ThreadArt<S> {
    pub(crate) image: DynamicImage,
    pub(crate) parameters: Parameters,
    pub(crate) pegs: PegTable<S>,
    pub(crate) raster: RasterBuffer<S>,
    pub(crate) threads: Threads,
    pub(crate) rng: SmallRng,
    pub(crate) stats: ErrorStats<S>,
    /// Channel the stroke and sampling plane are currently set up for.
    pub(crate) channel: Option<Channel>,
}

impl<S: Float> ThreadArt<S> {
    pub fn new(image: DynamicImage, parameters: Parameters) -> Result<Self, Error> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::InvalidImage {
                width: image.width(),
                height: image.height(),
            });
        }
        let parameters = parameters.coerced();
        let (raster, threads, pegs) = Self::layout(&image, &parameters);
        let mut art = Self {
            image,
            rng: Self::rng(&parameters),
            parameters,
            pegs,
            raster,
            threads,
            stats: ErrorStats::default(),
            channel: None,
        };
        art.measure();
        Ok(art)
    }

    fn layout(image: &DynamicImage, parameters: &Parameters) -> (RasterBuffer<S>, Threads, PegTable<S>) {
        let crop = Crop::new(parameters.zoom, parameters.zoom_offset_x, parameters.zoom_offset_y);
        let mut raster = RasterBuffer::new(image, crop, parameters.quality);
        let mut threads = Threads::new(parameters.mode);
        threads.initialize_from_buffer(&mut raster, parameters.invert_colors);
        let pegs = PegTable::new(parameters.shape, raster.grid(), parameters.pegs_count);
        log::debug!(
            "laid out {} {:?} pegs over a {}x{} buffer",
            pegs.len(),
            parameters.shape,
            raster.grid().width,
            raster.grid().height
        );
        (raster, threads, pegs)
    }

    fn rng(parameters: &Parameters) -> SmallRng {
        match parameters.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    /// Rebuilds everything from the current parameters, dropping all threads.
    pub fn reset(&mut self) {
        log::debug!("resetting with {:?}", self.parameters);
        let (raster, threads, pegs) = Self::layout(&self.image, &self.parameters);
        self.raster = raster;
        self.threads = threads;
        self.pegs = pegs;
        self.rng = Self::rng(&self.parameters);
        self.channel = None;
        self.measure();
    }

    /// Merges `overrides` into the parameters. Anything but a new target
    /// segment count triggers a [`Self::reset`].
    pub fn configure(&mut self, overrides: &Overrides) {
        let parameters = self.parameters.merged(overrides);
        if parameters == self.parameters {
            return;
        }
        let relayout = !parameters.same_layout(&self.parameters);
        self.parameters = parameters;
        if relayout {
            self.reset();
        }
    }

    pub fn set_nb_lines(&mut self, nb_lines: usize) {
        self.configure(&Overrides::nb_lines(nb_lines));
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn pegs(&self) -> &PegTable<S> {
        &self.pegs
    }

    pub fn raster(&self) -> &RasterBuffer<S> {
        &self.raster
    }

    pub fn threads(&self) -> &Threads {
        &self.threads
    }

    pub fn stats(&self) -> ErrorStats<S> {
        self.stats
    }

    pub fn total_segments(&self) -> usize {
        self.threads.total_segments()
    }

    pub fn is_complete(&self) -> bool {
        self.total_segments() == self.parameters.nb_lines
    }

    pub(crate) fn stroke(&self, channel: Channel) -> Stroke<S> {
        Stroke::new(
            channel.plane(),
            S::of_f64(self.parameters.line_opacity),
            S::of_f64(self.parameters.line_thickness),
        )
    }

    /// Points the stroke and the sampling plane at `channel`.
    pub(crate) fn switch_channel(&mut self, channel: Channel) {
        log::trace!("switching to {channel:?}");
        let stroke = self.stroke(channel);
        self.raster.set_stroke(stroke);
        self.threads.select_channel(channel, &mut self.raster);
        self.channel = Some(channel);
    }

    pub(crate) fn draw(&mut self, from: usize, to: usize) {
        let segment = Segment::new(self.pegs[from].position, self.pegs[to].position);
        self.raster.draw_segment(segment);
    }

    pub(crate) fn measure(&mut self) {
        self.stats = ErrorStats::measure(self.raster.planes());
        log::debug!(
            "{} segments: error average {:.3}, mean square {:.3}, variance {:.3}",
            self.total_segments(),
            self.stats.average,
            self.stats.mean_square,
            self.stats.variance
        );
    }
}
