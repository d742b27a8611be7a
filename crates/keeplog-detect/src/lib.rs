//! Change detection for keeplog.
//!
//! A [`Detector`] decides whether it understands the free text of a
//! [`ChangeSource`](keeplog_change::ChangeSource) and turns it into typed
//! [`Changes`](keeplog_change::Changes). Detectors are evaluated by a
//! [`DetectorChain`] in a fixed priority order:
//! 1. [`HtmlDetector`]: an HTML `change-log` block in the description
//! 2. [`ConventionalDetector`]: a Conventional Commits header
//! 3. [`PrefixDetector`]: a well-known verb at the start of the title
//! 4. [`DefaultDetector`]: everything else, as "Changed"

mod chain;
mod conventional;
mod detector;
mod error;
mod fallback;
mod html;
mod prefix;

pub use chain::DetectorChain;
pub use conventional::ConventionalDetector;
pub use detector::Detector;
pub use error::{DetectError, DetectResult};
pub use fallback::DefaultDetector;
pub use html::HtmlDetector;
pub use prefix::PrefixDetector;
