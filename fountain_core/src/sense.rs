use serde::{Deserialize, Serialize};

use crate::{
    game::{Variant, World},
    map::{RoomKind, neighbors8},
};

pub const ENTRANCE_MESSAGE: &str = "You see a light coming from the cavern entrance.";
pub const FOUNTAIN_OFF_MESSAGE: &str =
    "You hear water dripping in this room. The Fountain of Objects is here!";
pub const FOUNTAIN_ON_MESSAGE: &str =
    "You hear the rushing waters from the Fountain of Objects. It has been reactivated!";
pub const PIT_DRAFT_MESSAGE: &str = "You feel a draft. There is a pit in a nearby room.";

/// Something the player can notice about their surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sense {
    /// Standing in the entrance.
    Entrance,
    /// Standing in the fountain room.
    Fountain,
    /// A pit in one of the eight surrounding rooms.
    PitDraft,
}

impl Sense {
    /// The senses active in a variant, in the order they are reported.
    pub fn registered(variant: Variant) -> &'static [Sense] {
        match variant {
            Variant::Classic => &[Sense::Entrance, Sense::Fountain],
            Variant::Pits => &[Sense::Entrance, Sense::Fountain, Sense::PitDraft],
        }
    }

    pub fn can_sense(self, world: &World) -> bool {
        match self {
            Sense::Entrance => world.current_room() == RoomKind::Entrance,
            Sense::Fountain => world.current_room() == RoomKind::Fountain,
            Sense::PitDraft => neighbors8(world.player.position)
                .any(|position| world.map.room_kind_at(position) == RoomKind::Pit),
        }
    }

    pub fn describe(self, world: &World) -> &'static str {
        match self {
            Sense::Entrance => ENTRANCE_MESSAGE,
            Sense::Fountain if world.fountain_on => FOUNTAIN_ON_MESSAGE,
            Sense::Fountain => FOUNTAIN_OFF_MESSAGE,
            Sense::PitDraft => PIT_DRAFT_MESSAGE,
        }
    }
}
