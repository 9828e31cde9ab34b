//! Host-side fakes for firmware tests

use alloc::collections::{BTreeMap, VecDeque};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use sideeye_core::mock::{MemStorage, RecordingDisplay, RecordingNetwork};
use sideeye_hal::{FlashError, InputPin, KvStore, StorageKey, UartRx, UartTx};

use crate::platform::Platform;

/// Key-value store held in memory
#[derive(Debug, Default)]
pub struct MemKv {
    values: BTreeMap<StorageKey, Vec<u8>>,
}

impl MemKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: StorageKey) -> bool {
        self.values.contains_key(&key)
    }
}

impl KvStore for MemKv {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let value = self.values.get(&key).ok_or(FlashError::NotFound)?;
        let dest = buffer
            .get_mut(..value.len())
            .ok_or(FlashError::BufferTooSmall)?;
        dest.copy_from_slice(value);
        Ok(value.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        self.values.insert(key, data.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), FlashError> {
        self.values.remove(&key).map(|_| ()).ok_or(FlashError::NotFound)
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        self.values.contains_key(&key)
    }
}

/// Button pin whose level the test controls through a shared cell
#[derive(Debug, Clone, Default)]
pub struct FakePin {
    pub low: Rc<Cell<bool>>,
}

impl InputPin for FakePin {
    fn is_high(&self) -> bool {
        !self.low.get()
    }
}

/// Serial port with a scripted receive queue
#[derive(Debug, Default)]
pub struct FakeSerial {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl FakeSerial {
    pub fn queue(&mut self, text: &str) {
        self.rx.extend(text.bytes());
    }

    /// Transmitted lines, drained
    pub fn take_lines(&mut self) -> Vec<alloc::string::String> {
        let text = core::mem::take(&mut self.tx);
        alloc::string::String::from_utf8_lossy(&text)
            .lines()
            .map(alloc::string::String::from)
            .collect()
    }
}

impl UartRx for FakeSerial {
    type Error = ();

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl UartTx for FakeSerial {
    type Error = ();

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
        self.tx.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

pub struct TestPlatform;

impl Platform for TestPlatform {
    type Button = FakePin;
    type Serial = FakeSerial;
    type Display = RecordingDisplay;
    type Network = RecordingNetwork;
    type Storage = MemStorage;
    type ConfigStore = MemKv;
}
