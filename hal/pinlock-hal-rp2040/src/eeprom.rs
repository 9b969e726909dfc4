//! Emulated EEPROM for RP2040
//!
//! The security region is a small byte image kept in RAM. A commit stores
//! the whole image as one item of a sequential-storage map in the last
//! 64KB of flash, which spreads the writes over the partition.
//!
//! Implements the `ByteStorage` trait from `pinlock-hal`.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use pinlock_hal::{ByteStorage, RamStorage, StorageError, StorageKey};
use sequential_storage::cache::NoCache;
use sequential_storage::map;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const PARTITION_SIZE: usize = 64 * 1024;
pub const PARTITION_START: usize = FLASH_SIZE - PARTITION_SIZE;

/// Flash range for the key-value partition
pub const PARTITION_RANGE: core::ops::Range<u32> = (PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Size of the emulated EEPROM region
pub const REGION_SIZE: usize = 32;

/// Scratch space for one map item: key, length and the region
const ITEM_BUFFER_SIZE: usize = 128;

/// Flash-backed byte region with EEPROM commit semantics
pub struct Rp2040Eeprom<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    image: RamStorage<REGION_SIZE>,
}

impl<'d> Rp2040Eeprom<'d> {
    /// Create the driver with an erased image
    ///
    /// Call [`load`](Self::load) before handing it to the lock logic.
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
            image: RamStorage::new(),
        }
    }

    /// Fetch the stored image from flash
    ///
    /// A partition without the item leaves the image erased.
    pub async fn load(&mut self) -> Result<(), StorageError> {
        let mut buffer = [0u8; ITEM_BUFFER_SIZE];

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            PARTITION_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &StorageKey::SecurityState,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                self.image.load_image(data);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(_) => Err(StorageError::Read),
        }
    }

    /// Erase the whole partition
    pub async fn erase_all(&mut self) -> Result<(), StorageError> {
        self.flash
            .erase(PARTITION_START as u32, FLASH_SIZE as u32)
            .await
            .map_err(|_| StorageError::Flash)?;
        self.image = RamStorage::new();
        Ok(())
    }

    async fn store(&mut self) -> Result<(), StorageError> {
        let mut buffer = [0u8; ITEM_BUFFER_SIZE];
        let data: &[u8] = self.image.working();

        map::store_item(
            &mut self.flash,
            PARTITION_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &StorageKey::SecurityState,
            &data,
        )
        .await
        .map_err(|_| StorageError::Flash)
    }
}

impl ByteStorage for Rp2040Eeprom<'_> {
    fn capacity(&self) -> usize {
        REGION_SIZE
    }

    fn read(&self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        self.image.read(offset, buffer)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        self.image.write(offset, data)
    }

    /// Blocks until the item is in flash
    fn commit(&mut self) -> Result<(), StorageError> {
        embassy_futures::block_on(self.store())?;
        self.image.commit()
    }
}
