pub mod codec;
pub mod digest;

pub use codec::{decode, encode, DecodeMode, ALPHABET, ENCODING_TAG};
pub use digest::{package_hash, AssetDigest, PackageHash};
