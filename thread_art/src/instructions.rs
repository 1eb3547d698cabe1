use crate::{
    engine::ThreadArt,
    params::Mode,
    pegs::PegTable,
    thread::{Channel, Thread},
    Float,
};

/// Step by step threading guide for a single peg sequence: a short header
/// followed by one numbered line per peg to wrap the thread around.
pub fn generate<S: Float>(pegs: &PegTable<S>, sequence: &[usize]) -> String {
    let mut text = format!(
        "{} pegs ({:?}), {} segments\n",
        pegs.len(),
        pegs.shape(),
        sequence.len().saturating_sub(1)
    );
    text.extend(
        sequence
            .iter()
            .enumerate()
            .map(|(step, &peg)| format!("{:>6}. {}\n", step + 1, pegs.name(peg))),
    );
    text
}

impl<S: Float> ThreadArt<S> {
    /// Threading guide, only available for dark monochrome thread.
    pub fn instructions(&self) -> Option<String> {
        if self.parameters.mode != Mode::Monochrome || self.parameters.invert_colors {
            return None;
        }
        Some(generate(&self.pegs, self.threads.sequence(Channel::Monochrome)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{params::Shape, Grid};

    #[test]
    fn lists_pegs_by_name() {
        let pegs = PegTable::<f64>::new(Shape::Rectangle, Grid::new(100, 100), 8);
        let text = generate(&pegs, &[0, 5, 2]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "8 pegs (Rectangle), 2 segments");
        assert_eq!(lines[1].trim(), format!("1. {}", pegs.name(0)));
        assert_eq!(lines[2].trim(), format!("2. {}", pegs.name(5)));
        assert_eq!(lines.len(), 4);
    }
}
