//! PARL_IO group and TX unit pool.
//!
//! A chip carries `GROUPS` PARL_IO instances with `UNITS` transmitters each.
//! Independently constructed drivers claim a transmitter here; a group
//! counts as installed (clock enabled, registers owned) while at least one
//! of its units is held.

use crate::driver::error::{ArgumentError, Error, ResourceError, Result};
use crate::internal::constants::{GROUP_COUNT, TX_UNITS_PER_GROUP};
use crate::sync::CriticalSectionCell;

/// Identity of an acquired TX unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnitId {
    group: u8,
    index: u8,
}

impl UnitId {
    /// Group the unit belongs to
    #[inline(always)]
    pub const fn group(&self) -> usize {
        self.group as usize
    }

    /// Unit index within the group
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.index as usize
    }
}

/// Reference-counted pool of TX units.
pub struct UnitRegistry<const GROUPS: usize, const UNITS: usize> {
    taken: CriticalSectionCell<[[bool; UNITS]; GROUPS]>,
}

/// Registry sized for the selected chip
pub type TxUnitRegistry = UnitRegistry<GROUP_COUNT, TX_UNITS_PER_GROUP>;

/// Registry shared by every unit on the chip
pub static TX_UNITS: TxUnitRegistry = UnitRegistry::new();

impl<const GROUPS: usize, const UNITS: usize> UnitRegistry<GROUPS, UNITS> {
    /// Empty registry (const, suitable for static initialization)
    pub const fn new() -> Self {
        Self {
            taken: CriticalSectionCell::new([[false; UNITS]; GROUPS]),
        }
    }

    /// Claim the first free unit of `group`.
    ///
    /// # Errors
    ///
    /// - [`ArgumentError::InvalidGroup`] if `group` does not exist
    /// - [`ResourceError::NoFreeUnit`] if every unit of the group is held
    pub fn acquire_unit(&self, group: usize) -> Result<UnitId> {
        if group >= GROUPS {
            return Err(ArgumentError::InvalidGroup.into());
        }

        let acquired = self.taken.with(|taken| {
            let slot = taken[group].iter().position(|t| !*t)?;
            taken[group][slot] = true;
            Some(slot)
        });

        match acquired {
            Some(index) => {
                debug!("acquired tx unit {} in group {}", index, group);
                Ok(UnitId {
                    group: group as u8,
                    index: index as u8,
                })
            }
            None => Err(Error::ResourceExhausted(ResourceError::NoFreeUnit)),
        }
    }

    /// Return `unit` to the pool. Releasing a free unit is a no-op.
    pub fn release_unit(&self, unit: UnitId) {
        let (group, index) = (unit.group(), unit.index());
        if group >= GROUPS || index >= UNITS {
            return;
        }
        self.taken.with(|taken| taken[group][index] = false);
        debug!("released tx unit {} in group {}", index, group);
    }

    /// Number of units currently held in `group`.
    pub fn group_refs(&self, group: usize) -> usize {
        if group >= GROUPS {
            return 0;
        }
        self.taken
            .with_ref(|taken| taken[group].iter().filter(|t| **t).count())
    }

    /// True while at least one unit of `group` is held.
    pub fn is_group_installed(&self, group: usize) -> bool {
        self.group_refs(group) > 0
    }
}

impl<const GROUPS: usize, const UNITS: usize> Default for UnitRegistry<GROUPS, UNITS> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::error::ErrorKind;

    #[test]
    fn acquire_until_exhausted() {
        let registry: UnitRegistry<1, 2> = UnitRegistry::new();

        let a = registry.acquire_unit(0).unwrap();
        let b = registry.acquire_unit(0).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.group_refs(0), 2);

        let err = registry.acquire_unit(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
    }

    #[test]
    fn release_makes_unit_reusable() {
        let registry: UnitRegistry<1, 1> = UnitRegistry::new();
        let unit = registry.acquire_unit(0).unwrap();
        assert!(registry.is_group_installed(0));

        registry.release_unit(unit);
        assert!(!registry.is_group_installed(0));
        assert_eq!(registry.acquire_unit(0).unwrap(), unit);
    }

    #[test]
    fn invalid_group_rejected() {
        let registry: UnitRegistry<2, 1> = UnitRegistry::new();
        assert_eq!(
            registry.acquire_unit(2),
            Err(Error::InvalidArgument(ArgumentError::InvalidGroup))
        );
        assert_eq!(registry.group_refs(5), 0);
    }

    #[test]
    fn groups_are_independent() {
        let registry: UnitRegistry<2, 1> = UnitRegistry::new();
        let first = registry.acquire_unit(0).unwrap();
        let second = registry.acquire_unit(1).unwrap();

        assert_eq!(first.group(), 0);
        assert_eq!(second.group(), 1);
        assert_eq!(second.index(), 0);

        registry.release_unit(first);
        assert_eq!(registry.group_refs(0), 0);
        assert_eq!(registry.group_refs(1), 1);
    }

    #[test]
    fn double_release_is_harmless() {
        let registry: UnitRegistry<1, 2> = UnitRegistry::new();
        let unit = registry.acquire_unit(0).unwrap();
        registry.release_unit(unit);
        registry.release_unit(unit);
        assert_eq!(registry.group_refs(0), 0);
    }
}
