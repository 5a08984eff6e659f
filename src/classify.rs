use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::contract::CaptureContext;
use crate::workflow::session::{ImageRef, Outcome};

/// Decision procedure that assigns an [`Outcome`] to a verified image.
///
/// The signature already carries the image reference and capture context so
/// a real detector speaking the [`crate::contract`] types can replace
/// [`RandomClassifier`] without the controller changing.
pub trait Classifier: Send {
    fn classify(&mut self, image: &ImageRef, context: &CaptureContext) -> Outcome;
}

/// Placeholder classifier: a uniform pick over the three categories.
pub struct RandomClassifier {
    rng: StdRng,
}

impl RandomClassifier {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for RandomClassifier {
    fn classify(&mut self, _image: &ImageRef, _context: &CaptureContext) -> Outcome {
        Outcome::ALL[self.rng.gen_range(0..Outcome::ALL.len())]
    }
}
