//! Command vocabulary.
//!
//! One command per input line: a keyword followed by space-separated arguments.
//! Numeric arguments accept decimal or `0x`-prefixed hexadecimal.

use std::str::FromStr;

use crate::alloc::AllocId;
use crate::common::{PhysAddr, SimError, VirtAddr};
use crate::config::{Placement, ReplacementPolicy};

/// A parsed simulator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `init memory <size>`: reset the contiguous allocator and select it.
    InitMemory(u64),
    /// `init buddy <size>`: reset the buddy allocator and select it.
    InitBuddy(u64),
    /// `init_vm <physical> <page_size>`: reset virtual memory.
    InitVm {
        /// Physical memory size in bytes.
        physical: u64,
        /// Page size in bytes.
        page_size: u64,
    },
    /// `set allocator first_fit|best_fit|worst_fit`.
    SetAllocator(Placement),
    /// `set vm_policy fifo|lru`.
    SetVmPolicy(ReplacementPolicy),
    /// `malloc <size>`.
    Malloc(u64),
    /// `free <id>`.
    Free(AllocId),
    /// `dump`: layout of the active allocator.
    Dump,
    /// `stats`: statistics of the active allocator.
    Stats,
    /// `access <paddr>`: probe the cache hierarchy.
    Access(PhysAddr),
    /// `vm_access <vaddr>`: translate, then probe the cache hierarchy.
    VmAccess(VirtAddr),
    /// `vm_stats`: page hit and fault counts.
    VmStats,
    /// `dump_vm`: resident page-to-frame mappings.
    DumpVm,
    /// `cache_stats`: per-level cache counters and access time totals.
    CacheStats,
    /// `exit`.
    Exit,
}

/// Parses a decimal or `0x`-prefixed hexadecimal number.
fn parse_num(token: &str) -> Result<u64, SimError> {
    let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => token.parse(),
    };
    parsed.map_err(|e| SimError::Parse(format!("invalid number '{token}': {e}")))
}

/// Pulls the next argument or reports which one is missing.
fn arg<'a>(args: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<&'a str, SimError> {
    args.next()
        .ok_or_else(|| SimError::Parse(format!("missing {what}")))
}

impl FromStr for Command {
    type Err = SimError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let keyword = arg(&mut tokens, "command")?;

        let cmd = match keyword {
            "init" => match arg(&mut tokens, "init target")? {
                "memory" => Self::InitMemory(parse_num(arg(&mut tokens, "size")?)?),
                "buddy" => Self::InitBuddy(parse_num(arg(&mut tokens, "size")?)?),
                other => return Err(SimError::Parse(format!("unknown init target '{other}'"))),
            },
            "init_vm" => Self::InitVm {
                physical: parse_num(arg(&mut tokens, "physical size")?)?,
                page_size: parse_num(arg(&mut tokens, "page size")?)?,
            },
            "set" => match arg(&mut tokens, "setting")? {
                "allocator" => Self::SetAllocator(
                    arg(&mut tokens, "allocator")?
                        .parse()
                        .map_err(SimError::Parse)?,
                ),
                "vm_policy" => Self::SetVmPolicy(
                    arg(&mut tokens, "policy")?
                        .parse()
                        .map_err(SimError::Parse)?,
                ),
                other => return Err(SimError::Parse(format!("unknown setting '{other}'"))),
            },
            "malloc" => Self::Malloc(parse_num(arg(&mut tokens, "size")?)?),
            "free" => {
                let token = arg(&mut tokens, "id")?;
                Self::Free(
                    token
                        .parse()
                        .map_err(|e| SimError::Parse(format!("invalid id '{token}': {e}")))?,
                )
            }
            "dump" => Self::Dump,
            "stats" => Self::Stats,
            "access" => Self::Access(parse_num(arg(&mut tokens, "address")?)?.into()),
            "vm_access" => Self::VmAccess(parse_num(arg(&mut tokens, "address")?)?.into()),
            "vm_stats" => Self::VmStats,
            "dump_vm" => Self::DumpVm,
            "cache_stats" => Self::CacheStats,
            "exit" => Self::Exit,
            other => return Err(SimError::Parse(format!("unknown command '{other}'"))),
        };

        if let Some(extra) = tokens.next() {
            return Err(SimError::Parse(format!("unexpected argument '{extra}'")));
        }
        Ok(cmd)
    }
}
