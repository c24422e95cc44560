use crate::image::MemoryImage;

use super::{
    AccessMode, AccessWindow, ByteLane, LaneStorage, MemoryConfig, MemoryError, PortInputs,
    ReadOnlyLanes, ReadWriteLanes,
};

/// A clocked, byte-lane writable instruction memory with a registered read port.
///
/// Every call to [`InstructionMemory::tick`] is one rising clock edge. Inputs
/// are sampled at the edge; the read result and its valid gate are both
/// registered, so a word requested on cycle N is presented on `data_out`
/// after that edge and stays there until the next one.
pub struct InstructionMemory {
    window: AccessWindow,
    storage: Box<dyn LaneStorage>,
    read_valid: bool,
    read_data: u16,
    cycle: u64,
}

impl InstructionMemory {
    /// Creates the memory, loading both lanes from the image.
    ///
    /// A short image is padded with zero words; an image longer than the
    /// window is rejected.
    pub fn new(config: MemoryConfig, image: &MemoryImage) -> Result<Self, MemoryError> {
        let window = AccessWindow::new(&config)?;
        let words = image.fit(window.words())?;

        let storage: Box<dyn LaneStorage> = match config.mode {
            AccessMode::ReadWrite => Box::new(ReadWriteLanes::new(words)),
            AccessMode::ReadOnly => Box::new(ReadOnlyLanes::new(words)),
        };

        Ok(Self {
            window,
            storage,
            read_valid: false,
            read_data: 0,
            cycle: 0,
        })
    }

    /// Applies one clock edge and provides the resulting output port value
    pub fn tick(&mut self, inputs: &PortInputs) -> u16 {
        let decoded = self.window.decode(inputs.address);

        if decoded.hit && inputs.update_enable {
            for lane in ByteLane::ALL {
                if inputs.write_enable.contains(lane) {
                    // Read-only storage refuses every write
                    let _ = self
                        .storage
                        .set_lane(lane, decoded.index, inputs.lane_data(lane));
                }
            }
        }

        // Readback follows the write so a same-cycle read sees the new word
        self.read_data = if decoded.hit {
            self.storage.get_word(decoded.index).unwrap_or(0)
        } else {
            0
        };
        self.read_valid = inputs.read_enable && decoded.hit;
        self.cycle += 1;

        self.data_out()
    }

    /// Provides the value currently driven on the output port
    pub fn data_out(&self) -> u16 {
        if self.read_valid {
            self.read_data
        } else {
            0
        }
    }

    /// Provides the stored word at the address without touching the pipeline registers
    pub fn inspect(&self, address: u16) -> Option<u16> {
        let decoded = self.window.decode(address);
        if decoded.hit {
            self.storage.get_word(decoded.index).ok()
        } else {
            None
        }
    }

    /// Provides every stored word in index order
    pub fn contents(&self) -> Vec<u16> {
        (0..self.storage.len())
            .map(|i| self.storage.get_word(i).unwrap_or(0))
            .collect()
    }

    /// Provides the current contents as an image
    pub fn snapshot(&self) -> MemoryImage {
        MemoryImage::new(self.contents())
    }

    /// Restores the initial image and clears the pipeline registers
    pub fn reset(&mut self) {
        self.storage.reset();
        self.read_valid = false;
        self.read_data = 0;
        self.cycle = 0;
    }

    pub fn window(&self) -> &AccessWindow {
        &self.window
    }

    pub fn is_read_only(&self) -> bool {
        self.storage.is_read_only()
    }

    /// Number of clock edges applied since creation or the last reset
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}
