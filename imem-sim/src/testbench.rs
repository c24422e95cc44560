use core::fmt;

use imem::{InstructionMemory, PortInputs};

use crate::stimulus::{Command, CommandLoc};

/// Port values observed across one clock edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleRecord {
    pub cycle: u64,
    pub inputs: PortInputs,
    pub data_out: u16,
}

impl fmt::Display for CycleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>6} {} dout=0x{:04x}",
            self.cycle, self.inputs, self.data_out
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunError {
    ExpectMismatch {
        line: usize,
        cycle: u64,
        expected: u16,
        actual: u16,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectMismatch {
                line,
                cycle,
                expected,
                actual,
            } => write!(
                f,
                "Line {line} - cycle {cycle} expected 0x{expected:04x}, found 0x{actual:04x}"
            ),
        }
    }
}

/// Drives a memory from a parsed script, recording every cycle
pub struct Testbench<'a> {
    memory: &'a mut InstructionMemory,
    records: Vec<CycleRecord>,
    checks: usize,
}

impl<'a> Testbench<'a> {
    pub fn new(memory: &'a mut InstructionMemory) -> Self {
        Self {
            memory,
            records: Vec::new(),
            checks: 0,
        }
    }

    pub fn step(&mut self, inputs: &PortInputs) -> u16 {
        let data_out = self.memory.tick(inputs);
        self.records.push(CycleRecord {
            cycle: self.memory.cycle(),
            inputs: *inputs,
            data_out,
        });
        data_out
    }

    /// Runs the script, stopping at the first failed expectation
    pub fn run(&mut self, script: &[CommandLoc]) -> Result<(), RunError> {
        for c in script.iter() {
            match c.cmd {
                Command::Clock { inputs, count } => {
                    for _ in 0..count {
                        self.step(&inputs);
                    }
                }
                Command::Expect(expected) => {
                    let actual = self.memory.data_out();
                    self.checks += 1;
                    if actual != expected {
                        return Err(RunError::ExpectMismatch {
                            line: c.line,
                            cycle: self.memory.cycle(),
                            expected,
                            actual,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    pub fn records(&self) -> &[CycleRecord] {
        &self.records
    }

    /// Number of expectations evaluated so far
    pub fn checks(&self) -> usize {
        self.checks
    }
}
