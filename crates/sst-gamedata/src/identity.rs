//! Host-game identity bitmask.
//!
//! Converted from: examples/original_source/src/gametype.h's
//! `GAMETYPE_BASETAGS` enum-bit generation and compound-tag `#define`s
//! (`_gametype_tag_L4D`, `_gametype_tag_L4Dbased`, etc). The C header
//! generates one enum bit per tag via macro-expansion; here the same tags
//! are plain `Identity` bit constants, and the OR-of-bits compound tags
//! become `const Identity` values built from those bits.

/// A bitmask of host-game/engine-branch tags. Each bit corresponds to one
/// declared tag; gamedata entries and `GAMESPECIFIC()` feature declarations
/// are matched against this at init.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity(pub u32);

impl Identity {
    pub const NONE: Identity = Identity(0);

    pub const ORANGE_BOX: Identity = Identity(1 << 0);
    pub const V2013: Identity = Identity(1 << 1);
    pub const L4D1: Identity = Identity(1 << 2);
    pub const L4D2: Identity = Identity(1 << 3);
    pub const PORTAL2: Identity = Identity(1 << 4);
    pub const PORTAL1: Identity = Identity(1 << 5);
    pub const HL2SERIES: Identity = Identity(1 << 6);
    pub const CLIENT015: Identity = Identity(1 << 7);
    pub const CLIENT014: Identity = Identity(1 << 8);
    pub const SERVER021: Identity = Identity(1 << 9);
    pub const SRVDLL009: Identity = Identity(1 << 10);
    pub const SRVDLL005: Identity = Identity(1 << 11);
    pub const L4D2_2125PLUS: Identity = Identity(1 << 12);
    pub const THE_LAST_STAND: Identity = Identity(1 << 13);

    /// `_gametype_tag_L4D`: either Left 4 Dead game.
    pub const L4D: Identity = Identity(Self::L4D1.0 | Self::L4D2.0);
    /// `_gametype_tag_L4Dbased`: anything sharing the L4D-family engine base.
    pub const L4D_BASED: Identity = Identity(Self::L4D.0 | Self::PORTAL2.0);
    /// `_gametype_tag_OrangeBoxbased`.
    pub const ORANGE_BOX_BASED: Identity = Identity(Self::ORANGE_BOX.0 | Self::V2013.0);
    /// `_gametype_tag_Portal`: either Portal game.
    pub const PORTAL: Identity = Identity(Self::PORTAL1.0 | Self::PORTAL2.0);

    pub fn union(self, other: Identity) -> Identity {
        Identity(self.0 | other.0)
    }

    /// Mirrors `GAMETYPE_MATCHES(x)`: true if any bit of `self` is set in
    /// `other` (or, used the other way, if the running host's identity
    /// overlaps a tag expression).
    pub fn matches(self, other: Identity) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_subset_of(self, other: Identity) -> bool {
        self.0 & other.0 == self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Resolves a gamedata-file tag name (the identifier following
    /// `_gametype_tag_` in the original macro scheme, lowercased) to its
    /// bit or compound value. Used by the gamedata text-format compiler
    /// to turn a written tag like `l4dbased` into an `Identity`.
    pub fn by_name(name: &str) -> Option<Identity> {
        Some(match name {
            "orangebox" => Self::ORANGE_BOX,
            "v2013" => Self::V2013,
            "l4d1" => Self::L4D1,
            "l4d2" => Self::L4D2,
            "portal2" => Self::PORTAL2,
            "portal1" => Self::PORTAL1,
            "hl2series" => Self::HL2SERIES,
            "client015" => Self::CLIENT015,
            "client014" => Self::CLIENT014,
            "server021" => Self::SERVER021,
            "srvdll009" => Self::SRVDLL009,
            "srvdll005" => Self::SRVDLL005,
            "l4d2_2125plus" => Self::L4D2_2125PLUS,
            "thelaststand" => Self::THE_LAST_STAND,
            "l4d" => Self::L4D,
            "l4dbased" => Self::L4D_BASED,
            "orangeboxbased" => Self::ORANGE_BOX_BASED,
            "portal" => Self::PORTAL,
            _ => return None,
        })
    }
}

impl std::ops::BitOr for Identity {
    type Output = Identity;
    fn bitor(self, rhs: Identity) -> Identity {
        self.union(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_tag_matches_either_member() {
        assert!(Identity::L4D.matches(Identity::L4D1));
        assert!(Identity::L4D.matches(Identity::L4D2));
        assert!(!Identity::L4D.matches(Identity::PORTAL2));
    }

    #[test]
    fn l4d_based_includes_portal2() {
        assert!(Identity::L4D_BASED.matches(Identity::PORTAL2));
    }

    #[test]
    fn by_name_resolves_known_tags_and_rejects_unknown() {
        assert_eq!(Identity::by_name("l4dbased"), Some(Identity::L4D_BASED));
        assert_eq!(Identity::by_name("portal1"), Some(Identity::PORTAL1));
        assert_eq!(Identity::by_name("nonexistentgame"), None);
    }

    #[test]
    fn subset_check() {
        assert!(Identity::L4D1.is_subset_of(Identity::L4D));
        assert!(!Identity::PORTAL2.is_subset_of(Identity::L4D));
    }
}
