use std::io;
use std::num::NonZeroU64;
use std::ops::{Deref, DerefMut};

use log::debug;
use memmap2::{MmapMut, MmapOptions};
use rand::Rng;

use crate::error::Error;

/// The memory block being touched: an anonymous private mapping.
///
/// Reserving the mapping commits no physical pages; the kernel backs a page
/// only on its first write. The mapping is released when the block drops.
pub struct Block {
    map: MmapMut,
}

impl Block {
    pub fn allocate(len: NonZeroU64) -> Result<Self, Error> {
        let bytes = len.get();
        let len = usize::try_from(bytes)
            .map_err(|_| Error::allocation(bytes, io::Error::from(io::ErrorKind::OutOfMemory)))?;
        let map = MmapOptions::new()
            .len(len)
            .map_anon()
            .map_err(|e| Error::allocation(bytes, e))?;
        debug!("Mapped {} bytes at {:p}", len, map.as_ptr());
        Ok(Self { map })
    }

    /// Writes a random byte to the first and the last offset.
    pub fn touch_ends<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let last = self.map.len() - 1;
        self.map[0] = rng.random();
        self.map[last] = rng.random();
    }
}

impl Deref for Block {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.map
    }
}

impl DerefMut for Block {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.map
    }
}
