use core::fmt;

/// Selects one half of every stored word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteLane {
    /// Bits [7:0]
    Low,
    /// Bits [15:8]
    High,
}

impl ByteLane {
    pub const ALL: [Self; 2] = [Self::Low, Self::High];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneStorageError {
    IndexBounds(usize),
    ReadOnlyMemory(usize),
}

impl fmt::Display for LaneStorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexBounds(ind) => write!(f, "Index Bounds {ind}"),
            Self::ReadOnlyMemory(ind) => write!(f, "Read Only Memory at index {ind}"),
        }
    }
}

/// Word storage addressed by word index, written one byte lane at a time
pub trait LaneStorage {
    /// Provides one lane of the word at the requested index
    fn get_lane(&self, lane: ByteLane, index: usize) -> Result<u8, LaneStorageError>;

    /// Sets one lane of the word at the requested index
    fn set_lane(&mut self, lane: ByteLane, index: usize, val: u8)
        -> Result<(), LaneStorageError>;

    /// Provides the number of words held
    fn len(&self) -> usize;

    /// Restores the initial contents
    fn reset(&mut self);

    fn is_read_only(&self) -> bool;

    /// Provides the word at the requested index as (high lane, low lane)
    fn get_word(&self, index: usize) -> Result<u16, LaneStorageError> {
        let hi = self.get_lane(ByteLane::High, index)?;
        let lo = self.get_lane(ByteLane::Low, index)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    fn within(&self, index: usize) -> bool {
        index < self.len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn split_word(word: u16) -> (u8, u8) {
    let [hi, lo] = word.to_be_bytes();
    (lo, hi)
}

/// Provides a read-write storage with independent low and high lanes
pub struct ReadWriteLanes {
    low: Vec<u8>,
    high: Vec<u8>,
    initial: Vec<u16>,
}

impl ReadWriteLanes {
    /// Splits each initial word across the two lanes
    pub fn new(initial: Vec<u16>) -> Self {
        let (low, high) = initial.iter().map(|w| split_word(*w)).unzip();
        Self {
            low,
            high,
            initial,
        }
    }

    fn lane(&self, lane: ByteLane) -> &[u8] {
        match lane {
            ByteLane::Low => &self.low,
            ByteLane::High => &self.high,
        }
    }
}

impl LaneStorage for ReadWriteLanes {
    fn get_lane(&self, lane: ByteLane, index: usize) -> Result<u8, LaneStorageError> {
        self.lane(lane)
            .get(index)
            .copied()
            .ok_or(LaneStorageError::IndexBounds(index))
    }

    fn set_lane(
        &mut self,
        lane: ByteLane,
        index: usize,
        val: u8,
    ) -> Result<(), LaneStorageError> {
        let cells = match lane {
            ByteLane::Low => &mut self.low,
            ByteLane::High => &mut self.high,
        };

        match cells.get_mut(index) {
            Some(cell) => {
                *cell = val;
                Ok(())
            }
            None => Err(LaneStorageError::IndexBounds(index)),
        }
    }

    fn len(&self) -> usize {
        self.low.len()
    }

    fn reset(&mut self) {
        for (i, w) in self.initial.iter().enumerate() {
            let (lo, hi) = split_word(*w);
            self.low[i] = lo;
            self.high[i] = hi;
        }
    }

    fn is_read_only(&self) -> bool {
        false
    }
}

/// Provides a storage whose contents are the initial image forever
pub struct ReadOnlyLanes {
    data: Vec<u16>,
}

impl ReadOnlyLanes {
    pub fn new(data: Vec<u16>) -> Self {
        Self { data }
    }
}

impl LaneStorage for ReadOnlyLanes {
    fn get_lane(&self, lane: ByteLane, index: usize) -> Result<u8, LaneStorageError> {
        let (lo, hi) = split_word(self.get_word(index)?);
        Ok(match lane {
            ByteLane::Low => lo,
            ByteLane::High => hi,
        })
    }

    fn get_word(&self, index: usize) -> Result<u16, LaneStorageError> {
        self.data
            .get(index)
            .copied()
            .ok_or(LaneStorageError::IndexBounds(index))
    }

    fn set_lane(&mut self, _: ByteLane, index: usize, _: u8) -> Result<(), LaneStorageError> {
        Err(LaneStorageError::ReadOnlyMemory(index))
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn reset(&mut self) {
        // Do Nothing
    }

    fn is_read_only(&self) -> bool {
        true
    }
}
