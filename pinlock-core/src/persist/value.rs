//! Typed access to byte storage

use pinlock_hal::{ByteStorage, StorageError};

/// A fixed-size value stored little-endian
pub trait StorageValue: Sized + Copy {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Encode into `out`, which is exactly `SIZE` bytes
    fn encode(self, out: &mut [u8]);

    /// Decode from `bytes`, which is exactly `SIZE` bytes
    fn decode(bytes: &[u8]) -> Self;
}

impl StorageValue for u8 {
    const SIZE: usize = 1;

    fn encode(self, out: &mut [u8]) {
        out[0] = self;
    }

    fn decode(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl StorageValue for u32 {
    const SIZE: usize = 4;

    fn encode(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        u32::from_le_bytes(raw)
    }
}

const MAX_VALUE_SIZE: usize = 8;

/// `get`/`put` of typed values at byte offsets
pub trait StorageExt: ByteStorage {
    fn get<T: StorageValue>(&self, offset: usize) -> Result<T, StorageError> {
        let mut raw = [0u8; MAX_VALUE_SIZE];
        let bytes = raw.get_mut(..T::SIZE).ok_or(StorageError::OutOfBounds)?;
        self.read(offset, bytes)?;
        Ok(T::decode(bytes))
    }

    fn put<T: StorageValue>(&mut self, offset: usize, value: T) -> Result<(), StorageError> {
        let mut raw = [0u8; MAX_VALUE_SIZE];
        let bytes = raw.get_mut(..T::SIZE).ok_or(StorageError::OutOfBounds)?;
        value.encode(bytes);
        self.write(offset, bytes)
    }
}

impl<S: ByteStorage + ?Sized> StorageExt for S {}
