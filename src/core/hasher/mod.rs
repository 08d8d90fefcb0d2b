//! # Hasher Module
//!
//! Decodes images and computes perceptual hashes.
//!
//! ## How It Works
//! 1. Decode the file once (`fast_decode`)
//! 2. Resize to a small grayscale square and run a DCT
//! 3. Keep one bit per low-frequency coefficient (8x8 = 64 bits)
//! 4. Compare hashes using Hamming distance
//!
//! ## Performance Optimizations
//! - Uses `zune-jpeg` for 1.5-2x faster JPEG decoding
//!
//! ## Example
//! ```rust,ignore
//! use snapsort::core::hasher::{FastDecoder, HashAlgorithm, PerceptualHasher};
//!
//! let image = FastDecoder::decode(&path)?;
//! let hash = PerceptualHasher::default().hash_image(&image);
//! ```

mod algorithms;
pub mod fast_decode;
mod traits;

pub use algorithms::PerceptualHasher;
pub use fast_decode::FastDecoder;
pub use traits::{HashAlgorithm, ImageHashValue, PerceptualHash};
