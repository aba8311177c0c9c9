//! Register blocks
//!
//! A [`RegisterBlock`] is one contiguous read from a device, indexed by absolute
//! register address. The [`RegisterSource`] trait lets the parser pull a
//! sensor's words out of one block or a set of blocks.

use crate::config::RegisterConfig;
use crate::error::{DecodeError, Result};

/// Anything that can answer "what is the value of register N"
pub trait RegisterSource {
    fn register(&self, address: u16) -> Option<u16>;

    /// Collect the words configured for a sensor, in address order
    fn words_for(&self, config: &RegisterConfig) -> Result<Vec<u16>> {
        config
            .address
            .as_slice()
            .iter()
            .map(|&address| {
                self.register(address)
                    .ok_or_else(|| DecodeError::missing_register(&config.name, address))
            })
            .collect()
    }
}

/// Contiguous register words starting at an absolute address
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterBlock {
    start: u16,
    words: Vec<u16>,
}

impl RegisterBlock {
    pub fn new(start: u16, words: Vec<u16>) -> Self {
        Self { start, words }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    /// Address one past the last register (u32 so a block ending at 0xFFFF fits)
    pub fn end(&self) -> u32 {
        u32::from(self.start) + self.words.len() as u32
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }

    pub fn get(&self, address: u16) -> Option<u16> {
        let index = address.checked_sub(self.start)?;
        self.words.get(usize::from(index)).copied()
    }

    pub fn contains(&self, address: u16) -> bool {
        self.get(address).is_some()
    }
}

impl RegisterSource for RegisterBlock {
    fn register(&self, address: u16) -> Option<u16> {
        self.get(address)
    }
}

/// Several batches read in one poll cycle; the first block holding an address wins
impl RegisterSource for [RegisterBlock] {
    fn register(&self, address: u16) -> Option<u16> {
        self.iter().find_map(|block| block.get(address))
    }
}

impl RegisterSource for Vec<RegisterBlock> {
    fn register(&self, address: u16) -> Option<u16> {
        self.as_slice().register(address)
    }
}
