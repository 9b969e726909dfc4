//! Persistent byte storage abstractions
//!
//! Models EEPROM-style storage: a small flat byte region that is read and
//! written in place and only becomes durable after an explicit commit.
//! Chip-specific HALs back the region with flash; [`RamStorage`] backs it
//! with memory for host tests.

/// Value of a byte that has never been written
pub const ERASED_BYTE: u8 = 0xFF;

/// Storage keys for data kept in the flash key-value partition
///
/// Flash-backed implementations store each byte region as one item
/// under its key. The partition handles wear leveling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Attempt counter and lockout record
    SecurityState = 0,
}

impl StorageKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::SecurityState),
            _ => None,
        }
    }
}

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Access outside the storage region
    OutOfBounds,
    /// Reading the backing medium failed
    Read,
    /// Writing the backing medium failed
    Write,
    /// Low-level flash operation failed
    Flash,
    /// Key-value item could not be encoded or decoded
    Serialization,
}

/// Flat addressable byte storage with explicit commit
///
/// Reads and writes act on a working image. Nothing written is guaranteed
/// to survive a power loss until [`ByteStorage::commit`] returns `Ok`.
/// There is no atomicity across separate writes: a power loss between two
/// writes and the following commit can leave the durable image with only
/// some of them, or none.
pub trait ByteStorage {
    /// Size of the storage region in bytes
    fn capacity(&self) -> usize;

    /// Read `buffer.len()` bytes starting at `offset`
    fn read(&self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` starting at `offset`
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;

    /// Flush pending writes to the durable medium
    ///
    /// Blocks until the medium has been written.
    fn commit(&mut self) -> Result<(), StorageError>;
}

impl<T: ByteStorage + ?Sized> ByteStorage for &mut T {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read(&self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        (**self).read(offset, buffer)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        (**self).write(offset, data)
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        (**self).commit()
    }
}

/// Check that `len` bytes at `offset` fit in a region of `capacity` bytes
pub fn check_range(offset: usize, len: usize, capacity: usize) -> Result<(), StorageError> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(StorageError::OutOfBounds),
    }
}

/// Memory-backed storage with EEPROM commit semantics
///
/// Keeps a working image and a committed image. [`RamStorage::power_cycle`]
/// throws away everything written since the last successful commit, which
/// is what a real device sees after an unplanned reboot.
#[derive(Debug, Clone)]
pub struct RamStorage<const N: usize> {
    working: [u8; N],
    committed: [u8; N],
    fail_commits: bool,
    commit_count: u32,
}

impl<const N: usize> Default for RamStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RamStorage<N> {
    /// Create erased storage (every byte reads [`ERASED_BYTE`])
    pub const fn new() -> Self {
        Self {
            working: [ERASED_BYTE; N],
            committed: [ERASED_BYTE; N],
            fail_commits: false,
            commit_count: 0,
        }
    }

    /// Create storage whose durable content is `image`
    pub const fn from_image(image: [u8; N]) -> Self {
        Self {
            working: image,
            committed: image,
            fail_commits: false,
            commit_count: 0,
        }
    }

    /// Durable content as of the last successful commit
    pub fn committed(&self) -> &[u8; N] {
        &self.committed
    }

    /// Working content including uncommitted writes
    pub fn working(&self) -> &[u8; N] {
        &self.working
    }

    /// Replace the working image, e.g. with data fetched from flash
    pub fn load_image(&mut self, image: &[u8]) {
        let len = image.len().min(N);
        self.working[..len].copy_from_slice(&image[..len]);
        self.committed = self.working;
    }

    /// Simulate a reboot: uncommitted writes are lost
    pub fn power_cycle(&mut self) {
        self.working = self.committed;
    }

    /// Make every following commit fail until cleared
    pub fn set_commit_failure(&mut self, fail: bool) {
        self.fail_commits = fail;
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> u32 {
        self.commit_count
    }
}

impl<const N: usize> ByteStorage for RamStorage<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        check_range(offset, buffer.len(), N)?;
        buffer.copy_from_slice(&self.working[offset..offset + buffer.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        check_range(offset, data.len(), N)?;
        self.working[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        if self.fail_commits {
            return Err(StorageError::Write);
        }
        self.committed = self.working;
        self.commit_count = self.commit_count.wrapping_add(1);
        Ok(())
    }
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match StorageKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_storage_is_erased() {
        let storage = RamStorage::<8>::new();
        let mut buf = [0u8; 8];
        storage.read(0, &mut buf).unwrap();
        assert_eq!(buf, [ERASED_BYTE; 8]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut storage = RamStorage::<8>::new();
        let mut buf = [0u8; 4];
        assert_eq!(storage.read(6, &mut buf), Err(StorageError::OutOfBounds));
        assert_eq!(storage.write(8, &[1]), Err(StorageError::OutOfBounds));
        assert_eq!(storage.write(usize::MAX, &[1]), Err(StorageError::OutOfBounds));
        assert!(storage.write(4, &[1, 2, 3, 4]).is_ok());
    }

    #[test]
    fn test_power_cycle_drops_uncommitted_writes() {
        let mut storage = RamStorage::<4>::new();
        storage.write(0, &[1]).unwrap();
        storage.commit().unwrap();
        storage.write(1, &[2]).unwrap();

        storage.power_cycle();

        assert_eq!(storage.working(), &[1, ERASED_BYTE, ERASED_BYTE, ERASED_BYTE]);
        assert_eq!(storage.commit_count(), 1);
    }

    #[test]
    fn test_commit_failure() {
        let mut storage = RamStorage::<4>::new();
        storage.set_commit_failure(true);
        storage.write(0, &[7]).unwrap();
        assert_eq!(storage.commit(), Err(StorageError::Write));
        assert_eq!(storage.committed()[0], ERASED_BYTE);

        storage.set_commit_failure(false);
        assert!(storage.commit().is_ok());
        assert_eq!(storage.committed()[0], 7);
    }

    #[test]
    fn test_storage_key_roundtrip() {
        assert_eq!(StorageKey::from_u8(0), Some(StorageKey::SecurityState));
        assert_eq!(StorageKey::SecurityState.as_u8(), 0);
        assert_eq!(StorageKey::from_u8(9), None);
    }
}
