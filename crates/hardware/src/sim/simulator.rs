//! Simulator: owns every engine side-by-side.
//!
//! All simulation state lives in one explicit context object instead of
//! process-wide globals, so independent simulations can coexist in one process.

use tracing::{debug, info};

use super::command::Command;
use super::response::Response;
use crate::alloc::{AllocId, AllocMode, BlockAllocator, BuddyAllocator};
use crate::common::{AllocError, PhysAddr, SimError, TranslateError, VirtAddr};
use crate::config::{Config, Placement, ReplacementPolicy};
use crate::hierarchy::{AccessOutcome, CacheHierarchy, VirtualAccess};
use crate::stats::{AllocatorStats, BuddyStats};
use crate::vm::AddressTranslator;

/// Top-level simulator: allocators, cache hierarchy, and virtual memory.
///
/// Every operation runs to completion before returning. The simulator is not
/// safe for concurrent mutation without external synchronization.
#[derive(Debug)]
pub struct Simulator {
    memory: Option<BlockAllocator>,
    buddy: Option<BuddyAllocator>,
    mode: AllocMode,
    placement: Placement,
    hierarchy: CacheHierarchy,
    vm: Option<AddressTranslator>,
    vm_policy: ReplacementPolicy,
}

impl Simulator {
    /// Creates a simulator with the configured hierarchy and no memory initialized.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::common::ConfigError) if a cache level is invalid.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        let hierarchy = CacheHierarchy::new(&config.cache, &config.memory)?;
        info!(
            l1_sets = hierarchy.l1.num_sets(),
            l2_sets = hierarchy.l2.num_sets(),
            l3_sets = hierarchy.l3.num_sets(),
            "memory simulator ready"
        );
        Ok(Self {
            memory: None,
            buddy: None,
            mode: AllocMode::Contiguous,
            placement: config.allocator.placement,
            hierarchy,
            vm: None,
            vm_policy: config.vm.policy,
        })
    }

    /// Executes one command.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for rejected initialization parameters and
    /// [`SimError::Translate`] for virtual memory misuse. State is unchanged on error.
    pub fn execute(&mut self, command: Command) -> Result<Response, SimError> {
        debug!(?command, "execute");
        let response = match command {
            Command::InitMemory(size) => {
                self.init_memory(size)?;
                Response::Done
            }
            Command::InitBuddy(size) => {
                self.init_buddy(size)?;
                Response::Done
            }
            Command::InitVm {
                physical,
                page_size,
            } => {
                self.init_vm(physical, page_size)?;
                Response::Done
            }
            Command::SetAllocator(placement) => {
                self.set_placement(placement);
                Response::Done
            }
            Command::SetVmPolicy(policy) => {
                self.set_vm_policy(policy);
                Response::Done
            }
            Command::Malloc(size) => match self.malloc(size) {
                Ok(id) => Response::Allocated(id),
                Err(e) => Response::AllocFailed(e),
            },
            Command::Free(id) => match self.free(id) {
                Ok(()) => Response::Freed,
                Err(_) => Response::InvalidId(id),
            },
            Command::Dump => match self.mode {
                AllocMode::Contiguous => Response::Layout(
                    self.memory
                        .as_ref()
                        .map(|m| m.blocks().to_vec())
                        .unwrap_or_default(),
                ),
                AllocMode::Buddy => Response::BuddyLayout(
                    self.buddy
                        .as_ref()
                        .map(|b| b.free_lists().collect())
                        .unwrap_or_default(),
                ),
            },
            Command::Stats => match self.mode {
                AllocMode::Contiguous => Response::AllocatorStats(
                    self.memory
                        .as_ref()
                        .map_or_else(AllocatorStats::default, BlockAllocator::stats),
                ),
                AllocMode::Buddy => Response::BuddyStats(
                    self.buddy
                        .as_ref()
                        .map_or_else(BuddyStats::default, BuddyAllocator::stats),
                ),
            },
            Command::Access(paddr) => Response::Access(self.access(paddr)),
            Command::VmAccess(vaddr) => Response::VmAccess(self.vm_access(vaddr)?),
            Command::VmStats => Response::VmStats(self.translator()?.stats()),
            Command::DumpVm => Response::PageTable(self.translator()?.mappings().collect()),
            Command::CacheStats => Response::CacheStats {
                caches: self.hierarchy.cache_stats(),
                access: self.hierarchy.stats(),
            },
            Command::Exit => Response::Exit,
        };
        Ok(response)
    }

    /// Resets the contiguous allocator to `size` bytes and makes it active.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if `size` is zero.
    pub fn init_memory(&mut self, size: u64) -> Result<(), SimError> {
        match self.memory.as_mut() {
            Some(memory) => memory.init(size)?,
            None => self.memory = Some(BlockAllocator::new(size, self.placement)?),
        }
        self.mode = AllocMode::Contiguous;
        Ok(())
    }

    /// Replaces the buddy allocator with a fresh `size`-byte space and makes it active.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if `size` is not a power of two.
    pub fn init_buddy(&mut self, size: u64) -> Result<(), SimError> {
        self.buddy = Some(BuddyAllocator::new(size)?);
        self.mode = AllocMode::Buddy;
        Ok(())
    }

    /// Replaces virtual memory with a fresh translator using the current policy.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the geometry yields no frames.
    pub fn init_vm(&mut self, physical: u64, page_size: u64) -> Result<(), SimError> {
        self.vm = Some(AddressTranslator::new(physical, page_size, self.vm_policy)?);
        Ok(())
    }

    /// Selects the contiguous placement policy, now and for future inits.
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
        if let Some(memory) = self.memory.as_mut() {
            memory.set_placement(placement);
        }
    }

    /// Selects the page replacement policy, now and for future inits.
    pub fn set_vm_policy(&mut self, policy: ReplacementPolicy) {
        self.vm_policy = policy;
        if let Some(vm) = self.vm.as_mut() {
            vm.set_policy(policy);
        }
    }

    /// Allocates with the active allocator.
    ///
    /// # Errors
    ///
    /// Returns the allocator's [`AllocError`], or [`AllocError::NotInitialized`]
    /// if the active allocator has not been initialized.
    pub fn malloc(&mut self, size: u64) -> Result<AllocId, AllocError> {
        match self.mode {
            AllocMode::Contiguous => self
                .memory
                .as_mut()
                .ok_or(AllocError::NotInitialized)?
                .allocate(size),
            AllocMode::Buddy => self
                .buddy
                .as_mut()
                .ok_or(AllocError::NotInitialized)?
                .allocate(size),
        }
    }

    /// Frees with the active allocator.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::UnknownId`] if `id` is not live in the active allocator.
    pub fn free(&mut self, id: AllocId) -> Result<(), AllocError> {
        match self.mode {
            AllocMode::Contiguous => self
                .memory
                .as_mut()
                .ok_or(AllocError::UnknownId(id))?
                .free(id),
            AllocMode::Buddy => self
                .buddy
                .as_mut()
                .ok_or(AllocError::UnknownId(id))?
                .free(id),
        }
    }

    /// Probes the cache hierarchy with a physical address.
    pub fn access(&mut self, paddr: PhysAddr) -> AccessOutcome {
        self.hierarchy.probe(paddr)
    }

    /// Translates a virtual address and probes the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::NotInitialized`] before `init_vm`, or
    /// [`TranslateError::OutOfRange`] for addresses beyond the virtual space.
    pub fn vm_access(&mut self, vaddr: VirtAddr) -> Result<VirtualAccess, TranslateError> {
        let vm = self.vm.as_mut().ok_or(TranslateError::NotInitialized)?;
        self.hierarchy.probe_virtual(vm, vaddr)
    }

    fn translator(&self) -> Result<&AddressTranslator, TranslateError> {
        self.vm.as_ref().ok_or(TranslateError::NotInitialized)
    }

    /// Active allocation mode.
    pub const fn mode(&self) -> AllocMode {
        self.mode
    }

    /// Contiguous allocator, once initialized.
    pub const fn memory(&self) -> Option<&BlockAllocator> {
        self.memory.as_ref()
    }

    /// Buddy allocator, once initialized.
    pub const fn buddy(&self) -> Option<&BuddyAllocator> {
        self.buddy.as_ref()
    }

    /// Cache hierarchy.
    pub const fn hierarchy(&self) -> &CacheHierarchy {
        &self.hierarchy
    }

    /// Virtual memory translator, once initialized.
    pub const fn vm(&self) -> Option<&AddressTranslator> {
        self.vm.as_ref()
    }
}
