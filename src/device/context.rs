// Index resolver: maps stable entity IDs to positional table slots
// during encode, and slots back to IDs during the decode link pass

use crate::core::config::{
    ChannelId, Config, ContactId, GroupListId, PositioningId, RadioIdId, RoamingZoneId, ScanListId,
};
use std::collections::HashMap;
use std::hash::Hash;

/// Bidirectional ID <-> slot mapping for one binary table. Slots need not
/// be dense: the decoder registers only valid records, while positions
/// keep advancing in slot-scan order so both directions agree with the
/// positions the encoder assigned.
#[derive(Debug, Default)]
pub struct SlotTable<K: Copy + Eq + Hash> {
    forward: HashMap<K, usize>,
    reverse: HashMap<usize, K>,
}

impl<K: Copy + Eq + Hash> SlotTable<K> {
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Register an entity at a table slot
    pub fn insert(&mut self, id: K, slot: usize) {
        self.forward.insert(id, slot);
        self.reverse.insert(slot, id);
    }

    /// Slot the entity occupies, if it is in this table
    pub fn index_of(&self, id: K) -> Option<usize> {
        self.forward.get(&id).copied()
    }

    /// Entity at a slot, if one was registered there
    pub fn id_at(&self, slot: usize) -> Option<K> {
        self.reverse.get(&slot).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Cross-reference tables for one encode or decode run. Slot order is
/// insertion order of the configuration lists; encode and decode must
/// agree on it, that is the whole point of this type.
#[derive(Debug, Default)]
pub struct Context {
    pub channels: SlotTable<ChannelId>,
    pub contacts: SlotTable<ContactId>,
    pub scan_lists: SlotTable<ScanListId>,
    pub group_lists: SlotTable<GroupListId>,
    pub positioning: SlotTable<PositioningId>,
    pub roaming: SlotTable<RoamingZoneId>,
    pub radio_ids: SlotTable<RadioIdId>,
}

impl Context {
    /// Empty context, filled slot by slot during decode pass 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign encode slots from the configuration's insertion order.
    /// DTMF contacts have no table in the supported family and occupy
    /// no contact slot.
    pub fn from_config(config: &Config) -> Self {
        let mut ctx = Self::new();

        for (slot, (id, _)) in config.channels().iter().enumerate() {
            ctx.channels.insert(*id, slot);
        }
        let mut slot = 0;
        for (id, contact) in config.contacts() {
            if contact.as_digital().is_some() {
                ctx.contacts.insert(*id, slot);
                slot += 1;
            }
        }
        for (slot, (id, _)) in config.scan_lists().iter().enumerate() {
            ctx.scan_lists.insert(*id, slot);
        }
        for (slot, (id, _)) in config.group_lists().iter().enumerate() {
            ctx.group_lists.insert(*id, slot);
        }
        for (slot, (id, _)) in config.positioning().iter().enumerate() {
            ctx.positioning.insert(*id, slot);
        }
        for (slot, (id, _)) in config.roaming().iter().enumerate() {
            ctx.roaming.insert(*id, slot);
        }
        for (slot, (id, _)) in config.radio_ids().iter().enumerate() {
            ctx.radio_ids.insert(*id, slot);
        }

        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::channel::Channel;
    use crate::core::contact::{Contact, DtmfContact};

    #[test]
    fn test_slot_table_roundtrip() {
        let mut table: SlotTable<ChannelId> = SlotTable::new();
        table.insert(ChannelId(7), 0);
        table.insert(ChannelId(3), 5);

        assert_eq!(table.index_of(ChannelId(7)), Some(0));
        assert_eq!(table.id_at(5), Some(ChannelId(3)));
        assert_eq!(table.index_of(ChannelId(99)), None);
        assert_eq!(table.id_at(1), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_from_config_insertion_order() {
        let mut config = Config::new();
        let a = config.add_channel(Channel::analog("A", 145_500_000, 145_500_000));
        let b = config.add_channel(Channel::analog("B", 145_525_000, 145_525_000));

        let ctx = Context::from_config(&config);
        assert_eq!(ctx.channels.index_of(a), Some(0));
        assert_eq!(ctx.channels.index_of(b), Some(1));
        assert_eq!(ctx.channels.id_at(1), Some(b));
    }

    #[test]
    fn test_dtmf_contacts_occupy_no_slot() {
        let mut config = Config::new();
        let tg = config.add_contact(Contact::group("TG9", 9));
        let dtmf = config.add_contact(Contact::Dtmf(DtmfContact {
            name: "Echolink".into(),
            digits: "*123#".into(),
            rx_tone: false,
        }));
        let private = config.add_contact(Contact::private("OM", 2623001));

        let ctx = Context::from_config(&config);
        assert_eq!(ctx.contacts.index_of(tg), Some(0));
        assert_eq!(ctx.contacts.index_of(dtmf), None);
        // The digital contact after the DTMF one takes the next slot
        assert_eq!(ctx.contacts.index_of(private), Some(1));
    }
}
