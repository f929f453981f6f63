// Configuration container: owns every entity, hands out stable ID
// handles, and clears references to removed entities

use super::channel::{Channel, ChannelMode};
use super::contact::Contact;
use super::lists::{ChannelRef, RxGroupList, ScanList, TxChannel, Zone};
use super::systems::{GpsSystem, RadioId, RoamingZone};
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);
    };
}

entity_id!(
    /// Stable handle to a channel
    ChannelId
);
entity_id!(
    /// Stable handle to a contact
    ContactId
);
entity_id!(
    /// Stable handle to a scan list
    ScanListId
);
entity_id!(
    /// Stable handle to an RX group list
    GroupListId
);
entity_id!(
    /// Stable handle to a zone
    ZoneId
);
entity_id!(
    /// Stable handle to a positioning system
    PositioningId
);
entity_id!(
    /// Stable handle to a roaming zone
    RoamingZoneId
);
entity_id!(
    /// Stable handle to a radio ID entry
    RadioIdId
);

/// The complete radio configuration. Entities are addressed by stable ID
/// handles; removing an entity clears every reference to it, so a held
/// handle either resolves or reads as none, never dangles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    next_id: u32,
    channels: Vec<(ChannelId, Channel)>,
    contacts: Vec<(ContactId, Contact)>,
    scan_lists: Vec<(ScanListId, ScanList)>,
    group_lists: Vec<(GroupListId, RxGroupList)>,
    zones: Vec<(ZoneId, Zone)>,
    positioning: Vec<(PositioningId, GpsSystem)>,
    roaming: Vec<(RoamingZoneId, RoamingZone)>,
    radio_ids: Vec<(RadioIdId, RadioId)>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    // --- channels ---

    pub fn channels(&self) -> &[(ChannelId, Channel)] {
        &self.channels
    }

    pub fn add_channel(&mut self, channel: Channel) -> ChannelId {
        let id = ChannelId(self.next());
        self.channels.push((id, channel));
        id
    }

    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.iter().find(|(i, _)| *i == id).map(|(_, c)| c)
    }

    pub fn channel_mut(&mut self, id: ChannelId) -> Option<&mut Channel> {
        self.channels
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, c)| c)
    }

    /// Remove a channel and clear every reference to it (zones, scan
    /// lists, GPS revert channels, roaming zones)
    pub fn remove_channel(&mut self, id: ChannelId) -> bool {
        let before = self.channels.len();
        self.channels.retain(|(i, _)| *i != id);
        if self.channels.len() == before {
            return false;
        }

        for (_, zone) in &mut self.zones {
            zone.a.retain(|c| *c != id);
            zone.b.retain(|c| *c != id);
        }
        for (_, list) in &mut self.scan_lists {
            list.members.retain(|m| *m != ChannelRef::Channel(id));
            if list.priority == Some(ChannelRef::Channel(id)) {
                list.priority = None;
            }
            if list.secondary == Some(ChannelRef::Channel(id)) {
                list.secondary = None;
            }
            if list.tx == TxChannel::Channel(id) {
                list.tx = TxChannel::Last;
            }
        }
        for (_, gps) in &mut self.positioning {
            if gps.revert == Some(id) {
                gps.revert = None;
            }
        }
        for (_, zone) in &mut self.roaming {
            zone.channels.retain(|c| *c != id);
        }
        true
    }

    // --- contacts ---

    pub fn contacts(&self) -> &[(ContactId, Contact)] {
        &self.contacts
    }

    pub fn add_contact(&mut self, contact: Contact) -> ContactId {
        let id = ContactId(self.next());
        self.contacts.push((id, contact));
        id
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|(i, _)| *i == id).map(|(_, c)| c)
    }

    /// Remove a contact and clear every reference to it (group lists,
    /// channel TX contacts, GPS destinations)
    pub fn remove_contact(&mut self, id: ContactId) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|(i, _)| *i != id);
        if self.contacts.len() == before {
            return false;
        }

        for (_, list) in &mut self.group_lists {
            list.contacts.retain(|c| *c != id);
        }
        for (_, channel) in &mut self.channels {
            if let ChannelMode::Digital(digital) = &mut channel.mode {
                if digital.tx_contact == Some(id) {
                    digital.tx_contact = None;
                }
            }
        }
        for (_, gps) in &mut self.positioning {
            if gps.destination == Some(id) {
                gps.destination = None;
            }
        }
        true
    }

    // --- scan lists ---

    pub fn scan_lists(&self) -> &[(ScanListId, ScanList)] {
        &self.scan_lists
    }

    pub fn add_scan_list(&mut self, list: ScanList) -> ScanListId {
        let id = ScanListId(self.next());
        self.scan_lists.push((id, list));
        id
    }

    pub fn scan_list(&self, id: ScanListId) -> Option<&ScanList> {
        self.scan_lists
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, l)| l)
    }

    pub fn scan_list_mut(&mut self, id: ScanListId) -> Option<&mut ScanList> {
        self.scan_lists
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, l)| l)
    }

    /// Remove a scan list and clear the channel references to it
    pub fn remove_scan_list(&mut self, id: ScanListId) -> bool {
        let before = self.scan_lists.len();
        self.scan_lists.retain(|(i, _)| *i != id);
        if self.scan_lists.len() == before {
            return false;
        }

        for (_, channel) in &mut self.channels {
            if channel.scan_list == Some(id) {
                channel.scan_list = None;
            }
        }
        true
    }

    // --- RX group lists ---

    pub fn group_lists(&self) -> &[(GroupListId, RxGroupList)] {
        &self.group_lists
    }

    pub fn add_group_list(&mut self, list: RxGroupList) -> GroupListId {
        let id = GroupListId(self.next());
        self.group_lists.push((id, list));
        id
    }

    pub fn group_list(&self, id: GroupListId) -> Option<&RxGroupList> {
        self.group_lists
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, l)| l)
    }

    pub fn group_list_mut(&mut self, id: GroupListId) -> Option<&mut RxGroupList> {
        self.group_lists
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, l)| l)
    }

    /// Remove a group list and clear the channel references to it
    pub fn remove_group_list(&mut self, id: GroupListId) -> bool {
        let before = self.group_lists.len();
        self.group_lists.retain(|(i, _)| *i != id);
        if self.group_lists.len() == before {
            return false;
        }

        for (_, channel) in &mut self.channels {
            if let ChannelMode::Digital(digital) = &mut channel.mode {
                if digital.group_list == Some(id) {
                    digital.group_list = None;
                }
            }
        }
        true
    }

    // --- zones ---

    pub fn zones(&self) -> &[(ZoneId, Zone)] {
        &self.zones
    }

    pub fn add_zone(&mut self, zone: Zone) -> ZoneId {
        let id = ZoneId(self.next());
        self.zones.push((id, zone));
        id
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|(i, _)| *i == id).map(|(_, z)| z)
    }

    pub fn zone_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.zones
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, z)| z)
    }

    pub fn remove_zone(&mut self, id: ZoneId) -> bool {
        let before = self.zones.len();
        self.zones.retain(|(i, _)| *i != id);
        self.zones.len() != before
    }

    // --- positioning systems ---

    pub fn positioning(&self) -> &[(PositioningId, GpsSystem)] {
        &self.positioning
    }

    pub fn add_gps(&mut self, gps: GpsSystem) -> PositioningId {
        let id = PositioningId(self.next());
        self.positioning.push((id, gps));
        id
    }

    pub fn gps(&self, id: PositioningId) -> Option<&GpsSystem> {
        self.positioning
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, g)| g)
    }

    pub fn gps_mut(&mut self, id: PositioningId) -> Option<&mut GpsSystem> {
        self.positioning
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, g)| g)
    }

    /// Remove a positioning system and clear the channel references to it
    pub fn remove_gps(&mut self, id: PositioningId) -> bool {
        let before = self.positioning.len();
        self.positioning.retain(|(i, _)| *i != id);
        if self.positioning.len() == before {
            return false;
        }

        for (_, channel) in &mut self.channels {
            match &mut channel.mode {
                ChannelMode::Digital(digital) => {
                    if digital.positioning == Some(id) {
                        digital.positioning = None;
                    }
                }
                ChannelMode::Analog(analog) => {
                    if analog.aprs == Some(id) {
                        analog.aprs = None;
                    }
                }
            }
        }
        true
    }

    // --- roaming zones ---

    pub fn roaming(&self) -> &[(RoamingZoneId, RoamingZone)] {
        &self.roaming
    }

    pub fn add_roaming(&mut self, zone: RoamingZone) -> RoamingZoneId {
        let id = RoamingZoneId(self.next());
        self.roaming.push((id, zone));
        id
    }

    pub fn roaming_zone(&self, id: RoamingZoneId) -> Option<&RoamingZone> {
        self.roaming.iter().find(|(i, _)| *i == id).map(|(_, r)| r)
    }

    pub fn roaming_zone_mut(&mut self, id: RoamingZoneId) -> Option<&mut RoamingZone> {
        self.roaming
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, r)| r)
    }

    /// Remove a roaming zone and clear the channel references to it
    pub fn remove_roaming(&mut self, id: RoamingZoneId) -> bool {
        let before = self.roaming.len();
        self.roaming.retain(|(i, _)| *i != id);
        if self.roaming.len() == before {
            return false;
        }

        for (_, channel) in &mut self.channels {
            if let ChannelMode::Digital(digital) = &mut channel.mode {
                if digital.roaming == Some(id) {
                    digital.roaming = None;
                }
            }
        }
        true
    }

    // --- radio IDs ---

    pub fn radio_ids(&self) -> &[(RadioIdId, RadioId)] {
        &self.radio_ids
    }

    pub fn add_radio_id(&mut self, radio_id: RadioId) -> RadioIdId {
        let id = RadioIdId(self.next());
        self.radio_ids.push((id, radio_id));
        id
    }

    pub fn radio_id(&self, id: RadioIdId) -> Option<&RadioId> {
        self.radio_ids
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, r)| r)
    }

    /// Remove a radio ID and reset referencing channels to the default ID
    pub fn remove_radio_id(&mut self, id: RadioIdId) -> bool {
        let before = self.radio_ids.len();
        self.radio_ids.retain(|(i, _)| *i != id);
        if self.radio_ids.len() == before {
            return false;
        }

        for (_, channel) in &mut self.channels {
            if let ChannelMode::Digital(digital) = &mut channel.mode {
                if digital.radio_id == Some(id) {
                    digital.radio_id = None;
                }
            }
        }
        true
    }
}
