// TYT MD-UV390 codeplug codec
//
// The codeplug image is a fixed 2 MiB block partitioned into fixed-offset,
// fixed-stride tables. Unused space and cleared records carry the 0xFF
// fill byte. All multi-byte integers are little endian, frequencies are
// 8-digit BCD of (Hz / 10) and names are zero-terminated UTF-16LE.

use super::context::{Context, SlotTable};
use super::{CodecError, CodecResult, CodecWarning, DecodeResult, DeviceCodec, EncodeResult};
use crate::bitwise::bcd::{decode_frequency, encode_frequency};
use crate::bitwise::elements::{get_bits, read_u24_le, read_utf16, set_bits, write_u24_le, write_utf16};
use crate::core::channel::{
    AnalogAdmit, AnalogSettings, Bandwidth, Channel, ChannelMode, DigitalAdmit, DigitalSettings,
    TimeSlot, COLOR_CODE_MAX, SQUELCH_MAX,
};
use crate::core::config::{
    ChannelId, Config, GroupListId, PositioningId, RoamingZoneId, ScanListId, ZoneId,
};
use crate::core::contact::{CallType, Contact, DigitalContact, DMR_ID_MAX};
use crate::core::lists::{ChannelRef, RxGroupList, ScanList, TxChannel, Zone};
use crate::core::power::Power;
use crate::core::signaling::{decode_tone, encode_tone};
use crate::core::systems::{GpsSystem, RadioId, RoamingZone};
use crate::memmap::MemoryMap;
use std::hash::Hash;

/// Total codeplug image size
pub const IMAGE_SIZE: usize = 0x20_0000;

/// Fill byte for unused space and cleared records
pub const FILL_BYTE: u8 = 0xFF;

const ADDR_RADIO_IDS: usize = 0x00_2100;
const RADIO_ID_SIZE: usize = 32;
pub const NUM_RADIO_IDS: usize = 16;

const ADDR_GPS: usize = 0x00_2400;
const GPS_SIZE: usize = 16;
pub const NUM_GPS_SYSTEMS: usize = 16;

const ADDR_GROUP_LISTS: usize = 0x00_EC20;
const GROUP_LIST_SIZE: usize = 96;
pub const NUM_GROUP_LISTS: usize = 250;
const GROUP_LIST_MEMBERS: usize = 32;

const ADDR_ZONES: usize = 0x01_4A00;
const ZONE_SIZE: usize = 96;
pub const NUM_ZONES: usize = 250;
const ZONE_MEMBERS: usize = 16;

const ADDR_SCAN_LISTS: usize = 0x01_A800;
const SCAN_LIST_SIZE: usize = 104;
pub const NUM_SCAN_LISTS: usize = 250;
const SCAN_LIST_MEMBERS: usize = 31;

const ADDR_ROAMING: usize = 0x02_1000;
const ROAMING_SIZE: usize = 96;
pub const NUM_ROAMING_ZONES: usize = 64;
const ROAMING_MEMBERS: usize = 31;

const ADDR_CHANNELS: usize = 0x11_0000;
const CHANNEL_SIZE: usize = 64;
pub const NUM_CHANNELS: usize = 3000;

const ADDR_CONTACTS: usize = 0x14_0000;
const CONTACT_SIZE: usize = 36;
pub const NUM_CONTACTS: usize = 10000;

/// Name fields are 16 zero-terminated UTF-16LE code units
const NAME_SIZE: usize = 32;

/// Channel mode discriminant (byte 0x00, bits 0-1)
const MODE_ANALOG: u8 = 1;
const MODE_DIGITAL: u8 = 2;

/// Channel-slot references inside scan lists: 0 = unused, 1 = the
/// currently selected channel, channel index + 2 otherwise
const CHANNEL_REF_NONE: u16 = 0x0000;
const CHANNEL_REF_SELECTED: u16 = 0x0001;

/// Designated TX channel: 0 = selected, 0xFFFF = last active,
/// channel index + 2 otherwise
const TX_SELECTED: u16 = 0x0000;
const TX_LAST: u16 = 0xFFFF;

fn check_capacity(table: &'static str, count: usize, capacity: usize) -> CodecResult<()> {
    if count > capacity {
        return Err(CodecError::CapacityExceeded {
            table,
            capacity,
            count,
        });
    }
    Ok(())
}

fn require_name(entity: &'static str, name: &str) -> CodecResult<()> {
    if name.is_empty() {
        return Err(CodecError::EmptyName { entity });
    }
    Ok(())
}

/// Encode an optional reference as (index + 1), 0 = none. A handle that
/// is missing from the context can only come from a foreign or stale ID;
/// it degrades to none with a warning instead of a dangling index.
fn encode_ref<K: Copy + Eq + Hash>(
    id: Option<K>,
    table: &SlotTable<K>,
    target: &'static str,
    field: &'static str,
    warnings: &mut Vec<CodecWarning>,
) -> u16 {
    match id {
        None => 0,
        Some(id) => match table.index_of(id) {
            Some(slot) => slot as u16 + 1,
            None => {
                tracing::warn!(field, table = target, "reference to an entity not in this config");
                warnings.push(CodecWarning::UnresolvedReference {
                    table: target,
                    field,
                    value: 0,
                });
                0
            }
        },
    }
}

/// Resolve an (index + 1) reference back to a handle, 0 = none.
/// Out-of-range indices resolve to none with a warning.
fn resolve_ref<K: Copy + Eq + Hash>(
    wire: u16,
    table: &SlotTable<K>,
    target: &'static str,
    field: &'static str,
    warnings: &mut Vec<CodecWarning>,
) -> Option<K> {
    if wire == 0 {
        return None;
    }
    let slot = wire as usize - 1;
    match table.id_at(slot) {
        Some(id) => Some(id),
        None => {
            tracing::warn!(field, table = target, slot, "reference outside target table");
            warnings.push(CodecWarning::UnresolvedReference {
                table: target,
                field,
                value: slot,
            });
            None
        }
    }
}

fn encode_channel_ref(
    reference: Option<ChannelRef>,
    ctx: &Context,
    field: &'static str,
    warnings: &mut Vec<CodecWarning>,
) -> u16 {
    match reference {
        None => CHANNEL_REF_NONE,
        Some(ChannelRef::Selected) => CHANNEL_REF_SELECTED,
        Some(ChannelRef::Channel(id)) => match ctx.channels.index_of(id) {
            Some(slot) => slot as u16 + 2,
            None => {
                tracing::warn!(field, "reference to a channel not in this config");
                warnings.push(CodecWarning::UnresolvedReference {
                    table: "channels",
                    field,
                    value: 0,
                });
                CHANNEL_REF_NONE
            }
        },
    }
}

fn resolve_channel_ref(
    wire: u16,
    ctx: &Context,
    field: &'static str,
    warnings: &mut Vec<CodecWarning>,
) -> Option<ChannelRef> {
    match wire {
        CHANNEL_REF_NONE => None,
        CHANNEL_REF_SELECTED => Some(ChannelRef::Selected),
        _ => {
            let slot = wire as usize - 2;
            match ctx.channels.id_at(slot) {
                Some(id) => Some(ChannelRef::Channel(id)),
                None => {
                    tracing::warn!(field, slot, "channel reference outside channel table");
                    warnings.push(CodecWarning::UnresolvedReference {
                        table: "channels",
                        field,
                        value: slot,
                    });
                    None
                }
            }
        }
    }
}

fn encode_tx_channel(
    tx: TxChannel,
    ctx: &Context,
    warnings: &mut Vec<CodecWarning>,
) -> u16 {
    match tx {
        TxChannel::Selected => TX_SELECTED,
        TxChannel::Last => TX_LAST,
        TxChannel::Channel(id) => match ctx.channels.index_of(id) {
            Some(slot) => slot as u16 + 2,
            None => {
                tracing::warn!("designated TX channel not in this config");
                warnings.push(CodecWarning::UnresolvedReference {
                    table: "channels",
                    field: "scan list TX channel",
                    value: 0,
                });
                TX_LAST
            }
        },
    }
}

fn resolve_tx_channel(
    wire: u16,
    ctx: &Context,
    warnings: &mut Vec<CodecWarning>,
) -> TxChannel {
    match wire {
        TX_SELECTED => TxChannel::Selected,
        TX_LAST => TxChannel::Last,
        CHANNEL_REF_SELECTED => {
            warnings.push(CodecWarning::UnresolvedReference {
                table: "channels",
                field: "scan list TX channel",
                value: 0,
            });
            TxChannel::Last
        }
        _ => {
            let slot = wire as usize - 2;
            match ctx.channels.id_at(slot) {
                Some(id) => TxChannel::Channel(id),
                None => {
                    warnings.push(CodecWarning::UnresolvedReference {
                        table: "channels",
                        field: "scan list TX channel",
                        value: slot,
                    });
                    TxChannel::Last
                }
            }
        }
    }
}

// --- channel element ---

/// Raw cross-references of one decoded channel, resolved in pass 2
#[derive(Debug, Default)]
struct ChannelLinks {
    scan_list: u16,
    group_list: u16,
    contact: u16,
    positioning: u16,
    roaming: u16,
    radio_id: u16,
}

/// Channel element, 64 bytes:
///
/// - 0x00 bits 0-1: mode (1 = analog, 2 = digital); bit 2: RX only;
///        bit 3: bandwidth (0 = narrow 12.5 kHz, 1 = wide 25 kHz)
/// - 0x01 bits 0-1: admit criterion (0 always, 1 channel free,
///        2 tone / color code); bits 4-7: color code
/// - 0x02 bits 0-1: time slot (1 or 2)
/// - 0x03: squelch level [0, 10]
/// - 0x04: RX frequency, 8-digit BCD of Hz/10, little endian
/// - 0x08: TX frequency, same encoding
/// - 0x0C: RX tone, u16 signaling wire value
/// - 0x0E: TX tone, u16 signaling wire value
/// - 0x10: TX timeout in seconds, 0 = disabled
/// - 0x12: power level, 0 = min .. 4 = max
/// - 0x14: scan list index + 1, 0 = none
/// - 0x16: RX group list index + 1, 0 = none
/// - 0x18: TX contact index + 1, 0 = none
/// - 0x1A: positioning system index + 1, 0 = none
/// - 0x1B: roaming zone index + 1, 0 = none
/// - 0x1C: radio ID index + 1, 0 = default
/// - 0x20: name, 16 UTF-16LE units
///
/// All other bytes are 0xFF fill. A cleared slot is entirely 0xFF and
/// reads back as unused (mode bits = 3, frequency not valid BCD).
fn encode_channel(
    channel: &Channel,
    ctx: &Context,
    warnings: &mut Vec<CodecWarning>,
) -> CodecResult<[u8; CHANNEL_SIZE]> {
    let mut data = [FILL_BYTE; CHANNEL_SIZE];

    let freq_err = |field: &'static str, value: u64| CodecError::FieldOutOfRange {
        entity: "channel",
        name: channel.name.clone(),
        field,
        value,
        max: 999_999_990,
    };
    if channel.rx_hz == 0 {
        return Err(freq_err("rx_frequency", 0));
    }
    if channel.tx_hz == 0 {
        return Err(freq_err("tx_frequency", 0));
    }
    let rx = encode_frequency(channel.rx_hz).map_err(|_| freq_err("rx_frequency", channel.rx_hz))?;
    let tx = encode_frequency(channel.tx_hz).map_err(|_| freq_err("tx_frequency", channel.tx_hz))?;
    data[0x04..0x08].copy_from_slice(&rx);
    data[0x08..0x0C].copy_from_slice(&tx);

    set_bits(&mut data[0x00], 2, 1, channel.rx_only as u8);
    data[0x10..0x12].copy_from_slice(&channel.tx_timeout.to_le_bytes());
    data[0x12] = channel.power.to_wire();

    let scan = encode_ref(
        channel.scan_list,
        &ctx.scan_lists,
        "scan lists",
        "channel scan list",
        warnings,
    );
    data[0x14..0x16].copy_from_slice(&scan.to_le_bytes());

    match &channel.mode {
        ChannelMode::Analog(analog) => {
            encode_analog_settings(channel, analog, ctx, &mut data, warnings)?
        }
        ChannelMode::Digital(digital) => {
            encode_digital_settings(channel, digital, ctx, &mut data, warnings)?
        }
    }

    write_utf16(&mut data[0x20..0x20 + NAME_SIZE], &channel.name);
    Ok(data)
}

fn encode_analog_settings(
    channel: &Channel,
    analog: &AnalogSettings,
    ctx: &Context,
    data: &mut [u8; CHANNEL_SIZE],
    warnings: &mut Vec<CodecWarning>,
) -> CodecResult<()> {
    set_bits(&mut data[0x00], 0, 2, MODE_ANALOG);
    set_bits(
        &mut data[0x00],
        3,
        1,
        (analog.bandwidth == Bandwidth::Wide) as u8,
    );

    let admit = match analog.admit {
        AnalogAdmit::Always => 0,
        AnalogAdmit::Free => 1,
        AnalogAdmit::Tone => 2,
    };
    set_bits(&mut data[0x01], 0, 2, admit);
    set_bits(&mut data[0x01], 4, 4, 0);
    set_bits(&mut data[0x02], 0, 2, 0);

    if analog.squelch > SQUELCH_MAX {
        return Err(CodecError::FieldOutOfRange {
            entity: "channel",
            name: channel.name.clone(),
            field: "squelch",
            value: analog.squelch as u64,
            max: SQUELCH_MAX as u64,
        });
    }
    data[0x03] = analog.squelch;

    data[0x0C..0x0E].copy_from_slice(&encode_tone(analog.rx_tone)?.to_le_bytes());
    data[0x0E..0x10].copy_from_slice(&encode_tone(analog.tx_tone)?.to_le_bytes());

    // Digital-only references stay at none
    data[0x16..0x1A].fill(0);
    let aprs = encode_ref(
        analog.aprs,
        &ctx.positioning,
        "positioning systems",
        "channel APRS system",
        warnings,
    );
    data[0x1A] = aprs as u8;
    data[0x1B] = 0;
    data[0x1C] = 0;
    Ok(())
}

fn encode_digital_settings(
    channel: &Channel,
    digital: &DigitalSettings,
    ctx: &Context,
    data: &mut [u8; CHANNEL_SIZE],
    warnings: &mut Vec<CodecWarning>,
) -> CodecResult<()> {
    set_bits(&mut data[0x00], 0, 2, MODE_DIGITAL);
    set_bits(&mut data[0x00], 3, 1, 0);

    let admit = match digital.admit {
        DigitalAdmit::Always => 0,
        DigitalAdmit::Free => 1,
        DigitalAdmit::ColorCode => 2,
    };
    set_bits(&mut data[0x01], 0, 2, admit);

    if digital.color_code > COLOR_CODE_MAX {
        return Err(CodecError::FieldOutOfRange {
            entity: "channel",
            name: channel.name.clone(),
            field: "color_code",
            value: digital.color_code as u64,
            max: COLOR_CODE_MAX as u64,
        });
    }
    set_bits(&mut data[0x01], 4, 4, digital.color_code);
    set_bits(&mut data[0x02], 0, 2, digital.time_slot.to_wire());
    data[0x03] = 0;

    // Tones are an analog concern
    data[0x0C..0x10].copy_from_slice(&[0xFF; 4]);

    let group = encode_ref(
        digital.group_list,
        &ctx.group_lists,
        "group lists",
        "channel group list",
        warnings,
    );
    data[0x16..0x18].copy_from_slice(&group.to_le_bytes());
    let contact = encode_ref(
        digital.tx_contact,
        &ctx.contacts,
        "contacts",
        "channel TX contact",
        warnings,
    );
    data[0x18..0x1A].copy_from_slice(&contact.to_le_bytes());
    data[0x1A] = encode_ref(
        digital.positioning,
        &ctx.positioning,
        "positioning systems",
        "channel positioning system",
        warnings,
    ) as u8;
    data[0x1B] = encode_ref(
        digital.roaming,
        &ctx.roaming,
        "roaming zones",
        "channel roaming zone",
        warnings,
    ) as u8;
    data[0x1C] = encode_ref(
        digital.radio_id,
        &ctx.radio_ids,
        "radio IDs",
        "channel radio ID",
        warnings,
    ) as u8;
    Ok(())
}

fn decode_channel(
    data: &[u8],
    slot: usize,
    warnings: &mut Vec<CodecWarning>,
) -> Option<(Channel, ChannelLinks)> {
    let invalid = |warnings: &mut Vec<CodecWarning>, reason: String| {
        tracing::warn!(slot, %reason, "skipping invalid channel record");
        warnings.push(CodecWarning::InvalidRecord {
            table: "channels",
            index: slot,
            reason,
        });
    };

    let mode = get_bits(data[0x00], 0, 2);
    // A cleared (0xFF) slot carries mode bits 3: unused, not an error
    if mode == 3 {
        return None;
    }
    if mode != MODE_ANALOG && mode != MODE_DIGITAL {
        invalid(warnings, format!("unknown channel mode {}", mode));
        return None;
    }

    let rx_field: [u8; 4] = data[0x04..0x08].try_into().ok()?;
    let tx_field: [u8; 4] = data[0x08..0x0C].try_into().ok()?;
    let rx_hz = match decode_frequency(&rx_field) {
        Ok(hz) if hz > 0 => hz,
        _ => {
            invalid(warnings, "RX frequency is not valid BCD".to_string());
            return None;
        }
    };
    let tx_hz = match decode_frequency(&tx_field) {
        Ok(hz) if hz > 0 => hz,
        _ => {
            invalid(warnings, "TX frequency is not valid BCD".to_string());
            return None;
        }
    };

    let power = match Power::from_wire(data[0x12]) {
        Some(power) => power,
        None => {
            invalid(warnings, format!("unknown power level {}", data[0x12]));
            return None;
        }
    };

    let mode = if mode == MODE_ANALOG {
        let admit = match get_bits(data[0x01], 0, 2) {
            0 => AnalogAdmit::Always,
            1 => AnalogAdmit::Free,
            value => {
                if value != 2 {
                    invalid(warnings, format!("unknown admit criterion {}", value));
                    return None;
                }
                AnalogAdmit::Tone
            }
        };

        let mut squelch = data[0x03];
        if squelch > SQUELCH_MAX {
            warnings.push(CodecWarning::InvalidRecord {
                table: "channels",
                index: slot,
                reason: format!("squelch {} clamped to {}", squelch, SQUELCH_MAX),
            });
            squelch = SQUELCH_MAX;
        }

        // Undecodable tones degrade to "disabled", the record survives
        let mut tone_of = |field: &'static str, wire: u16| match decode_tone(wire) {
            Ok(code) => code,
            Err(err) => {
                tracing::warn!(slot, field, %err, "tone treated as disabled");
                warnings.push(CodecWarning::InvalidRecord {
                    table: "channels",
                    index: slot,
                    reason: format!("{}: {}", field, err),
                });
                None
            }
        };
        let rx_tone = tone_of("rx_tone", u16::from_le_bytes([data[0x0C], data[0x0D]]));
        let tx_tone = tone_of("tx_tone", u16::from_le_bytes([data[0x0E], data[0x0F]]));

        ChannelMode::Analog(AnalogSettings {
            admit,
            squelch,
            rx_tone,
            tx_tone,
            bandwidth: if get_bits(data[0x00], 3, 1) != 0 {
                Bandwidth::Wide
            } else {
                Bandwidth::Narrow
            },
            aprs: None,
        })
    } else {
        let admit = match get_bits(data[0x01], 0, 2) {
            0 => DigitalAdmit::Always,
            1 => DigitalAdmit::Free,
            value => {
                if value != 2 {
                    invalid(warnings, format!("unknown admit criterion {}", value));
                    return None;
                }
                DigitalAdmit::ColorCode
            }
        };

        let time_slot = match TimeSlot::from_wire(get_bits(data[0x02], 0, 2)) {
            Some(ts) => ts,
            None => {
                invalid(
                    warnings,
                    format!("unknown time slot {}", get_bits(data[0x02], 0, 2)),
                );
                return None;
            }
        };

        ChannelMode::Digital(DigitalSettings {
            admit,
            color_code: get_bits(data[0x01], 4, 4),
            time_slot,
            group_list: None,
            tx_contact: None,
            positioning: None,
            roaming: None,
            radio_id: None,
        })
    };

    let channel = Channel {
        name: read_utf16(&data[0x20..0x20 + NAME_SIZE]),
        rx_hz,
        tx_hz,
        power,
        tx_timeout: u16::from_le_bytes([data[0x10], data[0x11]]),
        rx_only: get_bits(data[0x00], 2, 1) != 0,
        scan_list: None,
        mode,
    };
    let links = ChannelLinks {
        scan_list: u16::from_le_bytes([data[0x14], data[0x15]]),
        group_list: u16::from_le_bytes([data[0x16], data[0x17]]),
        contact: u16::from_le_bytes([data[0x18], data[0x19]]),
        positioning: data[0x1A] as u16,
        roaming: data[0x1B] as u16,
        radio_id: data[0x1C] as u16,
    };
    Some((channel, links))
}

// --- contact element ---

/// Contact element, 36 bytes:
///
/// - 0x00: DMR ID, u24 little endian; 0xFFFFFF marks an unused slot
/// - 0x03 bits 0-1: call type (1 group, 2 private, 3 all call);
///        bit 5: RX tone flag
/// - 0x04: name, 16 UTF-16LE units
fn encode_contact(contact: &DigitalContact) -> CodecResult<[u8; CONTACT_SIZE]> {
    let mut data = [FILL_BYTE; CONTACT_SIZE];

    if contact.number == 0 || contact.number > DMR_ID_MAX {
        return Err(CodecError::FieldOutOfRange {
            entity: "contact",
            name: contact.name.clone(),
            field: "number",
            value: contact.number as u64,
            max: DMR_ID_MAX as u64,
        });
    }
    data[0x00..0x03].copy_from_slice(&write_u24_le(contact.number));
    set_bits(&mut data[0x03], 0, 2, contact.call_type.to_wire());
    set_bits(&mut data[0x03], 5, 1, contact.rx_tone as u8);
    write_utf16(&mut data[0x04..0x04 + NAME_SIZE], &contact.name);
    Ok(data)
}

fn decode_contact(
    data: &[u8],
    slot: usize,
    warnings: &mut Vec<CodecWarning>,
) -> Option<DigitalContact> {
    let number = read_u24_le(data).ok()?;
    if number == DMR_ID_MAX {
        return None; // cleared slot
    }

    let call_type = match CallType::from_wire(get_bits(data[0x03], 0, 2)) {
        Some(ct) => ct,
        None => {
            warnings.push(CodecWarning::InvalidRecord {
                table: "contacts",
                index: slot,
                reason: "unknown call type 0".to_string(),
            });
            return None;
        }
    };
    if number == 0 {
        warnings.push(CodecWarning::InvalidRecord {
            table: "contacts",
            index: slot,
            reason: "DMR ID 0".to_string(),
        });
        return None;
    }

    Some(DigitalContact {
        name: read_utf16(&data[0x04..0x04 + NAME_SIZE]),
        call_type,
        number,
        rx_tone: get_bits(data[0x03], 5, 1) != 0,
    })
}

// --- zone element ---

#[derive(Debug, Default)]
struct ZoneLinks {
    a: Vec<u16>,
    b: Vec<u16>,
}

/// Zone element, 96 bytes: name (32), 16 VFO A members (u16 each,
/// channel index + 1, 0 = unused), 16 VFO B members. A slot whose first
/// name unit is 0x0000 or 0xFFFF is unused.
fn encode_zone(
    zone: &Zone,
    ctx: &Context,
    warnings: &mut Vec<CodecWarning>,
) -> CodecResult<[u8; ZONE_SIZE]> {
    require_name("zone", &zone.name)?;
    let mut data = [0u8; ZONE_SIZE];
    write_utf16(&mut data[0x00..NAME_SIZE], &zone.name);

    for (vfo, members, base) in [("VFO A", &zone.a, 0x20), ("VFO B", &zone.b, 0x40)] {
        if members.len() > ZONE_MEMBERS {
            tracing::warn!(zone = %zone.name, vfo, "zone channel list truncated");
            warnings.push(CodecWarning::Truncated {
                table: "zone members",
                capacity: ZONE_MEMBERS,
                count: members.len(),
            });
        }
        for (i, id) in members.iter().take(ZONE_MEMBERS).enumerate() {
            let wire = encode_ref(Some(*id), &ctx.channels, "channels", "zone member", warnings);
            data[base + i * 2..base + i * 2 + 2].copy_from_slice(&wire.to_le_bytes());
        }
    }
    Ok(data)
}

fn decode_zone(data: &[u8]) -> Option<(Zone, ZoneLinks)> {
    let first = u16::from_le_bytes([data[0], data[1]]);
    if first == 0x0000 || first == 0xFFFF {
        return None;
    }

    let members = |base: usize| -> Vec<u16> {
        (0..ZONE_MEMBERS)
            .map(|i| u16::from_le_bytes([data[base + i * 2], data[base + i * 2 + 1]]))
            .filter(|&w| w != 0)
            .collect()
    };
    let links = ZoneLinks {
        a: members(0x20),
        b: members(0x40),
    };
    let zone = Zone::new(read_utf16(&data[0x00..NAME_SIZE]));
    Some((zone, links))
}

// --- scan list element ---

#[derive(Debug, Default)]
struct ScanLinks {
    priority: u16,
    secondary: u16,
    tx: u16,
    members: Vec<u16>,
}

/// Scan list element, 104 bytes: name (32), priority channel (u16,
/// channel-ref scheme), secondary priority channel (u16), designated TX
/// channel (u16), hold time (u8, 25 ms steps), sample time (u8, 25 ms
/// steps), 31 members (u16, channel-ref scheme), 2 bytes pad.
fn encode_scan_list(
    list: &ScanList,
    ctx: &Context,
    warnings: &mut Vec<CodecWarning>,
) -> CodecResult<[u8; SCAN_LIST_SIZE]> {
    require_name("scan list", &list.name)?;
    let mut data = [0u8; SCAN_LIST_SIZE];
    write_utf16(&mut data[0x00..NAME_SIZE], &list.name);

    let priority = encode_channel_ref(list.priority, ctx, "scan list priority", warnings);
    data[0x20..0x22].copy_from_slice(&priority.to_le_bytes());
    let secondary = encode_channel_ref(list.secondary, ctx, "scan list secondary", warnings);
    data[0x22..0x24].copy_from_slice(&secondary.to_le_bytes());
    let tx = encode_tx_channel(list.tx, ctx, warnings);
    data[0x24..0x26].copy_from_slice(&tx.to_le_bytes());
    data[0x26] = list.hold_time;
    data[0x27] = list.sample_time;

    if list.members.len() > SCAN_LIST_MEMBERS {
        tracing::warn!(list = %list.name, "scan list members truncated");
        warnings.push(CodecWarning::Truncated {
            table: "scan list members",
            capacity: SCAN_LIST_MEMBERS,
            count: list.members.len(),
        });
    }
    for (i, member) in list.members.iter().take(SCAN_LIST_MEMBERS).enumerate() {
        let wire = encode_channel_ref(Some(*member), ctx, "scan list member", warnings);
        data[0x28 + i * 2..0x28 + i * 2 + 2].copy_from_slice(&wire.to_le_bytes());
    }
    data[SCAN_LIST_SIZE - 2..].fill(FILL_BYTE);
    Ok(data)
}

fn decode_scan_list(data: &[u8]) -> Option<(ScanList, ScanLinks)> {
    let first = u16::from_le_bytes([data[0], data[1]]);
    if first == 0x0000 || first == 0xFFFF {
        return None;
    }

    let mut list = ScanList::new(read_utf16(&data[0x00..NAME_SIZE]));
    list.hold_time = data[0x26];
    list.sample_time = data[0x27];
    let links = ScanLinks {
        priority: u16::from_le_bytes([data[0x20], data[0x21]]),
        secondary: u16::from_le_bytes([data[0x22], data[0x23]]),
        tx: u16::from_le_bytes([data[0x24], data[0x25]]),
        members: (0..SCAN_LIST_MEMBERS)
            .map(|i| u16::from_le_bytes([data[0x28 + i * 2], data[0x28 + i * 2 + 1]]))
            .filter(|&w| w != CHANNEL_REF_NONE)
            .collect(),
    };
    Some((list, links))
}

// --- RX group list element ---

/// Group list element, 96 bytes: name (32), 32 contact members (u16,
/// contact index + 1, 0 = unused).
fn encode_group_list(
    list: &RxGroupList,
    ctx: &Context,
    warnings: &mut Vec<CodecWarning>,
) -> CodecResult<[u8; GROUP_LIST_SIZE]> {
    require_name("group list", &list.name)?;
    let mut data = [0u8; GROUP_LIST_SIZE];
    write_utf16(&mut data[0x00..NAME_SIZE], &list.name);

    if list.contacts.len() > GROUP_LIST_MEMBERS {
        tracing::warn!(list = %list.name, "group list members truncated");
        warnings.push(CodecWarning::Truncated {
            table: "group list members",
            capacity: GROUP_LIST_MEMBERS,
            count: list.contacts.len(),
        });
    }
    for (i, id) in list.contacts.iter().take(GROUP_LIST_MEMBERS).enumerate() {
        let wire = encode_ref(
            Some(*id),
            &ctx.contacts,
            "contacts",
            "group list member",
            warnings,
        );
        data[0x20 + i * 2..0x20 + i * 2 + 2].copy_from_slice(&wire.to_le_bytes());
    }
    Ok(data)
}

fn decode_group_list(data: &[u8]) -> Option<(RxGroupList, Vec<u16>)> {
    let first = u16::from_le_bytes([data[0], data[1]]);
    if first == 0x0000 || first == 0xFFFF {
        return None;
    }

    let list = RxGroupList::new(read_utf16(&data[0x00..NAME_SIZE]));
    let members = (0..GROUP_LIST_MEMBERS)
        .map(|i| u16::from_le_bytes([data[0x20 + i * 2], data[0x20 + i * 2 + 1]]))
        .filter(|&w| w != 0)
        .collect();
    Some((list, members))
}

// --- GPS system element ---

#[derive(Debug, Default)]
struct GpsLinks {
    revert: u16,
    destination: u16,
}

/// GPS system element, 16 bytes: revert channel (u16, channel index + 1,
/// 0 = current), destination contact (u16, contact index + 1, 0 = none),
/// update period in seconds (u16, 0xFFFF marks an unused slot), 10 bytes
/// fill. The element carries no name.
fn encode_gps(
    gps: &GpsSystem,
    ctx: &Context,
    warnings: &mut Vec<CodecWarning>,
) -> CodecResult<[u8; GPS_SIZE]> {
    let mut data = [FILL_BYTE; GPS_SIZE];

    if gps.period == 0xFFFF {
        return Err(CodecError::FieldOutOfRange {
            entity: "GPS system",
            name: gps.name.clone(),
            field: "period",
            value: gps.period as u64,
            max: 0xFFFE,
        });
    }
    let revert = encode_ref(
        gps.revert,
        &ctx.channels,
        "channels",
        "GPS revert channel",
        warnings,
    );
    data[0x00..0x02].copy_from_slice(&revert.to_le_bytes());
    let destination = encode_ref(
        gps.destination,
        &ctx.contacts,
        "contacts",
        "GPS destination contact",
        warnings,
    );
    data[0x02..0x04].copy_from_slice(&destination.to_le_bytes());
    data[0x04..0x06].copy_from_slice(&gps.period.to_le_bytes());
    Ok(data)
}

fn decode_gps(data: &[u8], slot: usize) -> Option<(GpsSystem, GpsLinks)> {
    let period = u16::from_le_bytes([data[0x04], data[0x05]]);
    if period == 0xFFFF {
        return None;
    }

    let mut gps = GpsSystem::new(format!("GPS system {}", slot + 1));
    gps.period = period;
    let links = GpsLinks {
        revert: u16::from_le_bytes([data[0x00], data[0x01]]),
        destination: u16::from_le_bytes([data[0x02], data[0x03]]),
    };
    Some((gps, links))
}

// --- roaming zone element ---

/// Roaming zone element, 96 bytes: name (32), 31 channel members (u16,
/// channel index + 1, 0 = unused), 2 bytes pad.
fn encode_roaming(
    zone: &RoamingZone,
    ctx: &Context,
    warnings: &mut Vec<CodecWarning>,
) -> CodecResult<[u8; ROAMING_SIZE]> {
    require_name("roaming zone", &zone.name)?;
    let mut data = [0u8; ROAMING_SIZE];
    write_utf16(&mut data[0x00..NAME_SIZE], &zone.name);

    if zone.channels.len() > ROAMING_MEMBERS {
        tracing::warn!(zone = %zone.name, "roaming zone members truncated");
        warnings.push(CodecWarning::Truncated {
            table: "roaming zone members",
            capacity: ROAMING_MEMBERS,
            count: zone.channels.len(),
        });
    }
    for (i, id) in zone.channels.iter().take(ROAMING_MEMBERS).enumerate() {
        let wire = encode_ref(
            Some(*id),
            &ctx.channels,
            "channels",
            "roaming zone member",
            warnings,
        );
        data[0x20 + i * 2..0x20 + i * 2 + 2].copy_from_slice(&wire.to_le_bytes());
    }
    data[ROAMING_SIZE - 2..].fill(FILL_BYTE);
    Ok(data)
}

fn decode_roaming(data: &[u8]) -> Option<(RoamingZone, Vec<u16>)> {
    let first = u16::from_le_bytes([data[0], data[1]]);
    if first == 0x0000 || first == 0xFFFF {
        return None;
    }

    let zone = RoamingZone::new(read_utf16(&data[0x00..NAME_SIZE]));
    let members = (0..ROAMING_MEMBERS)
        .map(|i| u16::from_le_bytes([data[0x20 + i * 2], data[0x20 + i * 2 + 1]]))
        .filter(|&w| w != 0)
        .collect();
    Some((zone, members))
}

// --- radio ID element ---

/// Radio ID element, 32 bytes: DMR ID (u24 little endian, 0xFFFFFF marks
/// an unused slot), 1 byte fill, name (14 UTF-16LE units).
fn encode_radio_id(radio_id: &RadioId) -> CodecResult<[u8; RADIO_ID_SIZE]> {
    let mut data = [FILL_BYTE; RADIO_ID_SIZE];

    if radio_id.number == 0 || radio_id.number > DMR_ID_MAX {
        return Err(CodecError::FieldOutOfRange {
            entity: "radio ID",
            name: radio_id.name.clone(),
            field: "number",
            value: radio_id.number as u64,
            max: DMR_ID_MAX as u64,
        });
    }
    data[0x00..0x03].copy_from_slice(&write_u24_le(radio_id.number));
    write_utf16(&mut data[0x04..RADIO_ID_SIZE], &radio_id.name);
    Ok(data)
}

fn decode_radio_id(data: &[u8]) -> Option<RadioId> {
    let number = read_u24_le(data).ok()?;
    if number == DMR_ID_MAX || number == 0 {
        return None;
    }
    Some(RadioId::new(read_utf16(&data[0x04..RADIO_ID_SIZE]), number))
}

// --- assembler ---

/// Codec for the complete MD-UV390 codeplug image
#[derive(Debug, Default)]
pub struct Uv390Codeplug;

impl Uv390Codeplug {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceCodec for Uv390Codeplug {
    fn vendor(&self) -> &str {
        "TYT"
    }

    fn model(&self) -> &str {
        "MD-UV390"
    }

    fn image_size(&self) -> usize {
        IMAGE_SIZE
    }

    fn encode(&self, config: &Config) -> CodecResult<EncodeResult> {
        let digital_contacts = config
            .contacts()
            .iter()
            .filter(|(_, c)| c.as_digital().is_some())
            .count();
        check_capacity("channels", config.channels().len(), NUM_CHANNELS)?;
        check_capacity("contacts", digital_contacts, NUM_CONTACTS)?;
        check_capacity("zones", config.zones().len(), NUM_ZONES)?;
        check_capacity("scan lists", config.scan_lists().len(), NUM_SCAN_LISTS)?;
        check_capacity("group lists", config.group_lists().len(), NUM_GROUP_LISTS)?;
        check_capacity(
            "positioning systems",
            config.positioning().len(),
            NUM_GPS_SYSTEMS,
        )?;
        check_capacity("roaming zones", config.roaming().len(), NUM_ROAMING_ZONES)?;
        check_capacity("radio IDs", config.radio_ids().len(), NUM_RADIO_IDS)?;

        let ctx = Context::from_config(config);
        let mut warnings = Vec::new();

        let dtmf_count = config.contacts().iter().filter(|(_, c)| c.is_dtmf()).count();
        if dtmf_count > 0 {
            tracing::warn!(dtmf_count, "DTMF contacts are not encodable on this device");
            warnings.push(CodecWarning::Unsupported {
                reason: format!(
                    "{} DTMF contact(s) have no table on this device and were not encoded",
                    dtmf_count
                ),
            });
        }

        let mut image = MemoryMap::new_filled(IMAGE_SIZE, FILL_BYTE);

        for (slot, (_, channel)) in config.channels().iter().enumerate() {
            let record = encode_channel(channel, &ctx, &mut warnings)?;
            image.set_bytes(ADDR_CHANNELS + slot * CHANNEL_SIZE, &record)?;
        }
        let mut slot = 0;
        for (_, contact) in config.contacts() {
            if let Some(digital) = contact.as_digital() {
                image.set_bytes(ADDR_CONTACTS + slot * CONTACT_SIZE, &encode_contact(digital)?)?;
                slot += 1;
            }
        }
        for (slot, (_, zone)) in config.zones().iter().enumerate() {
            let record = encode_zone(zone, &ctx, &mut warnings)?;
            image.set_bytes(ADDR_ZONES + slot * ZONE_SIZE, &record)?;
        }
        for (slot, (_, list)) in config.scan_lists().iter().enumerate() {
            let record = encode_scan_list(list, &ctx, &mut warnings)?;
            image.set_bytes(ADDR_SCAN_LISTS + slot * SCAN_LIST_SIZE, &record)?;
        }
        for (slot, (_, list)) in config.group_lists().iter().enumerate() {
            let record = encode_group_list(list, &ctx, &mut warnings)?;
            image.set_bytes(ADDR_GROUP_LISTS + slot * GROUP_LIST_SIZE, &record)?;
        }
        for (slot, (_, gps)) in config.positioning().iter().enumerate() {
            let record = encode_gps(gps, &ctx, &mut warnings)?;
            image.set_bytes(ADDR_GPS + slot * GPS_SIZE, &record)?;
        }
        for (slot, (_, zone)) in config.roaming().iter().enumerate() {
            let record = encode_roaming(zone, &ctx, &mut warnings)?;
            image.set_bytes(ADDR_ROAMING + slot * ROAMING_SIZE, &record)?;
        }
        for (slot, (_, radio_id)) in config.radio_ids().iter().enumerate() {
            image.set_bytes(
                ADDR_RADIO_IDS + slot * RADIO_ID_SIZE,
                &encode_radio_id(radio_id)?,
            )?;
        }

        Ok(EncodeResult { image, warnings })
    }

    fn decode(&self, image: &MemoryMap) -> CodecResult<DecodeResult> {
        if image.len() < IMAGE_SIZE {
            return Err(CodecError::MalformedImage(format!(
                "image too short: {} bytes, expected {}",
                image.len(),
                IMAGE_SIZE
            )));
        }

        let mut config = Config::new();
        let mut ctx = Context::new();
        let mut warnings = Vec::new();

        // Pass 1: materialize every table, keeping raw cross-reference
        // indices for the link pass. Skipped slots leave holes on
        // purpose: positions must match what the encoder assigned.
        for slot in 0..NUM_CONTACTS {
            let data = image.get(ADDR_CONTACTS + slot * CONTACT_SIZE, CONTACT_SIZE)?;
            if let Some(contact) = decode_contact(data, slot, &mut warnings) {
                let id = config.add_contact(Contact::Digital(contact));
                ctx.contacts.insert(id, slot);
            }
        }
        for slot in 0..NUM_RADIO_IDS {
            let data = image.get(ADDR_RADIO_IDS + slot * RADIO_ID_SIZE, RADIO_ID_SIZE)?;
            if let Some(radio_id) = decode_radio_id(data) {
                let id = config.add_radio_id(radio_id);
                ctx.radio_ids.insert(id, slot);
            }
        }

        let mut channel_links: Vec<(ChannelId, ChannelLinks)> = Vec::new();
        for slot in 0..NUM_CHANNELS {
            let data = image.get(ADDR_CHANNELS + slot * CHANNEL_SIZE, CHANNEL_SIZE)?;
            if let Some((channel, links)) = decode_channel(data, slot, &mut warnings) {
                let id = config.add_channel(channel);
                ctx.channels.insert(id, slot);
                channel_links.push((id, links));
            }
        }

        let mut gps_links: Vec<(PositioningId, GpsLinks)> = Vec::new();
        for slot in 0..NUM_GPS_SYSTEMS {
            let data = image.get(ADDR_GPS + slot * GPS_SIZE, GPS_SIZE)?;
            if let Some((gps, links)) = decode_gps(data, slot) {
                let id = config.add_gps(gps);
                ctx.positioning.insert(id, slot);
                gps_links.push((id, links));
            }
        }

        let mut group_links: Vec<(GroupListId, Vec<u16>)> = Vec::new();
        for slot in 0..NUM_GROUP_LISTS {
            let data = image.get(ADDR_GROUP_LISTS + slot * GROUP_LIST_SIZE, GROUP_LIST_SIZE)?;
            if let Some((list, members)) = decode_group_list(data) {
                let id = config.add_group_list(list);
                ctx.group_lists.insert(id, slot);
                group_links.push((id, members));
            }
        }

        let mut scan_links: Vec<(ScanListId, ScanLinks)> = Vec::new();
        for slot in 0..NUM_SCAN_LISTS {
            let data = image.get(ADDR_SCAN_LISTS + slot * SCAN_LIST_SIZE, SCAN_LIST_SIZE)?;
            if let Some((list, links)) = decode_scan_list(data) {
                let id = config.add_scan_list(list);
                ctx.scan_lists.insert(id, slot);
                scan_links.push((id, links));
            }
        }

        let mut zone_links: Vec<(ZoneId, ZoneLinks)> = Vec::new();
        for slot in 0..NUM_ZONES {
            let data = image.get(ADDR_ZONES + slot * ZONE_SIZE, ZONE_SIZE)?;
            if let Some((zone, links)) = decode_zone(data) {
                let id = config.add_zone(zone);
                zone_links.push((id, links));
            }
        }

        let mut roaming_links: Vec<(RoamingZoneId, Vec<u16>)> = Vec::new();
        for slot in 0..NUM_ROAMING_ZONES {
            let data = image.get(ADDR_ROAMING + slot * ROAMING_SIZE, ROAMING_SIZE)?;
            if let Some((zone, members)) = decode_roaming(data) {
                let id = config.add_roaming(zone);
                ctx.roaming.insert(id, slot);
                roaming_links.push((id, members));
            }
        }

        // Pass 2: resolve cross-references now that every table is known
        for (id, links) in channel_links {
            let scan_list = resolve_ref(
                links.scan_list,
                &ctx.scan_lists,
                "scan lists",
                "channel scan list",
                &mut warnings,
            );
            let group_list = resolve_ref(
                links.group_list,
                &ctx.group_lists,
                "group lists",
                "channel group list",
                &mut warnings,
            );
            let tx_contact = resolve_ref(
                links.contact,
                &ctx.contacts,
                "contacts",
                "channel TX contact",
                &mut warnings,
            );
            let positioning = resolve_ref(
                links.positioning,
                &ctx.positioning,
                "positioning systems",
                "channel positioning system",
                &mut warnings,
            );
            let roaming = resolve_ref(
                links.roaming,
                &ctx.roaming,
                "roaming zones",
                "channel roaming zone",
                &mut warnings,
            );
            let radio_id = resolve_ref(
                links.radio_id,
                &ctx.radio_ids,
                "radio IDs",
                "channel radio ID",
                &mut warnings,
            );
            if let Some(channel) = config.channel_mut(id) {
                channel.scan_list = scan_list;
                match &mut channel.mode {
                    ChannelMode::Analog(analog) => analog.aprs = positioning,
                    ChannelMode::Digital(digital) => {
                        digital.group_list = group_list;
                        digital.tx_contact = tx_contact;
                        digital.positioning = positioning;
                        digital.roaming = roaming;
                        digital.radio_id = radio_id;
                    }
                }
            }
        }

        for (id, links) in gps_links {
            let revert = resolve_ref(
                links.revert,
                &ctx.channels,
                "channels",
                "GPS revert channel",
                &mut warnings,
            );
            let destination = resolve_ref(
                links.destination,
                &ctx.contacts,
                "contacts",
                "GPS destination contact",
                &mut warnings,
            );
            if let Some(gps) = config.gps_mut(id) {
                gps.revert = revert;
                gps.destination = destination;
            }
        }

        for (id, members) in group_links {
            let contacts: Vec<_> = members
                .into_iter()
                .filter_map(|wire| {
                    resolve_ref(
                        wire,
                        &ctx.contacts,
                        "contacts",
                        "group list member",
                        &mut warnings,
                    )
                })
                .collect();
            if let Some(list) = config.group_list_mut(id) {
                list.contacts = contacts;
            }
        }

        for (id, links) in scan_links {
            let priority =
                resolve_channel_ref(links.priority, &ctx, "scan list priority", &mut warnings);
            let secondary =
                resolve_channel_ref(links.secondary, &ctx, "scan list secondary", &mut warnings);
            let tx = resolve_tx_channel(links.tx, &ctx, &mut warnings);
            let members: Vec<_> = links
                .members
                .into_iter()
                .filter_map(|wire| {
                    resolve_channel_ref(wire, &ctx, "scan list member", &mut warnings)
                })
                .collect();
            if let Some(list) = config.scan_list_mut(id) {
                list.priority = priority;
                list.secondary = secondary;
                list.tx = tx;
                list.members = members;
            }
        }

        for (id, links) in zone_links {
            let resolve_members = |wires: Vec<u16>, warnings: &mut Vec<CodecWarning>| {
                wires
                    .into_iter()
                    .filter_map(|wire| {
                        resolve_ref(wire, &ctx.channels, "channels", "zone member", warnings)
                    })
                    .collect::<Vec<_>>()
            };
            let a = resolve_members(links.a, &mut warnings);
            let b = resolve_members(links.b, &mut warnings);
            if let Some(zone) = config.zone_mut(id) {
                zone.a = a;
                zone.b = b;
            }
        }

        for (id, members) in roaming_links {
            let channels: Vec<_> = members
                .into_iter()
                .filter_map(|wire| {
                    resolve_ref(
                        wire,
                        &ctx.channels,
                        "channels",
                        "roaming zone member",
                        &mut warnings,
                    )
                })
                .collect();
            if let Some(zone) = config.roaming_zone_mut(id) {
                zone.channels = channels;
            }
        }

        Ok(DecodeResult { config, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signaling::Code;

    fn codec() -> Uv390Codeplug {
        Uv390Codeplug::new()
    }

    /// A configuration exercising every table and reference kind
    fn sample_config() -> Config {
        let mut config = Config::new();

        let tg = config.add_contact(Contact::group("Regional", 8));
        let om = config.add_contact(Contact::private("DM3MAT", 2_623_001));

        let mut group = RxGroupList::new("Local");
        group.contacts = vec![tg];
        let group = config.add_group_list(group);

        let radio_id = config.add_radio_id(RadioId::new("Primary", 2_623_001));

        let mut analog1 = Channel::analog("2m RPT", 145_600_000, 145_000_000);
        {
            let settings = analog1.as_analog_mut().unwrap();
            settings.admit = AnalogAdmit::Tone;
            settings.squelch = 3;
            settings.rx_tone = Some(Code::ctcss(670).unwrap());
            settings.tx_tone = Some(Code::dcs(23, true).unwrap());
            settings.bandwidth = Bandwidth::Wide;
        }
        analog1.power = Power::Low;
        analog1.tx_timeout = 120;
        let analog1 = config.add_channel(analog1);

        let analog2 = config.add_channel(Channel::analog("70cm RPT", 438_600_000, 430_000_000));

        let mut digital = Channel::digital("TG8 TS2", 438_600_000, 430_000_000);
        {
            let settings = digital.as_digital_mut().unwrap();
            settings.color_code = 7;
            settings.time_slot = TimeSlot::Ts2;
            settings.group_list = Some(group);
            settings.tx_contact = Some(tg);
            settings.radio_id = Some(radio_id);
        }
        digital.rx_only = false;
        let digital = config.add_channel(digital);

        let mut gps = GpsSystem::new("Tracker");
        gps.destination = Some(om);
        gps.revert = Some(digital);
        gps.period = 180;
        let gps = config.add_gps(gps);
        config
            .channel_mut(digital)
            .unwrap()
            .as_digital_mut()
            .unwrap()
            .positioning = Some(gps);

        let mut roaming = RoamingZone::new("Roam");
        roaming.channels = vec![digital];
        let roaming = config.add_roaming(roaming);
        config
            .channel_mut(digital)
            .unwrap()
            .as_digital_mut()
            .unwrap()
            .roaming = Some(roaming);

        let mut scan = ScanList::new("Main scan");
        scan.members = vec![
            ChannelRef::Channel(analog1),
            ChannelRef::Selected,
            ChannelRef::Channel(digital),
        ];
        scan.priority = Some(ChannelRef::Channel(analog1));
        scan.secondary = Some(ChannelRef::Selected);
        scan.tx = TxChannel::Channel(analog2);
        let scan = config.add_scan_list(scan);
        config.channel_mut(analog1).unwrap().scan_list = Some(scan);

        let mut zone = Zone::new("Home");
        zone.a = vec![analog1, digital];
        zone.b = vec![analog2];
        config.add_zone(zone);

        config
    }

    #[test]
    fn test_channel_element_fixture() {
        let config = sample_config();
        let ctx = Context::from_config(&config);
        let mut warnings = Vec::new();

        let (_, channel) = &config.channels()[0];
        let data = encode_channel(channel, &ctx, &mut warnings).unwrap();
        assert!(warnings.is_empty());

        // Analog, not RX-only, wide: bits 0-1 = 01, bit 2 = 0, bit 3 = 1
        assert_eq!(data[0x00], 0xF9);
        // Admit tone, color code nibble cleared
        assert_eq!(data[0x01], 0x0E);
        assert_eq!(data[0x03], 3);
        // 145.6000 MHz -> 14560000 * 10 Hz, BCD little endian
        assert_eq!(&data[0x04..0x08], &[0x00, 0x00, 0x56, 0x14]);
        // 145.0000 MHz (negative offset)
        assert_eq!(&data[0x08..0x0C], &[0x00, 0x00, 0x50, 0x14]);
        // CTCSS 67.0 Hz -> 0x0670, DCS D023 inverted -> 0x8023
        assert_eq!(&data[0x0C..0x0E], &[0x70, 0x06]);
        assert_eq!(&data[0x0E..0x10], &[0x23, 0x80]);
        // 120 s timeout, low power
        assert_eq!(&data[0x10..0x12], &[120, 0]);
        assert_eq!(data[0x12], 1);
        // Scan list slot 0 -> wire 1
        assert_eq!(&data[0x14..0x16], &[0x01, 0x00]);
        // Name "2m RPT" in UTF-16LE
        assert_eq!(&data[0x20..0x26], &[b'2', 0, b'm', 0, b' ', 0]);
    }

    #[test]
    fn test_contact_element_fixture() {
        let contact = DigitalContact {
            name: "Regional".into(),
            call_type: CallType::Group,
            number: 8,
            rx_tone: true,
        };
        let data = encode_contact(&contact).unwrap();
        assert_eq!(&data[0x00..0x03], &[8, 0, 0]);
        // Group call (bits 0-1 = 01), RX tone bit 5 set, fill bits high
        assert_eq!(get_bits(data[0x03], 0, 2), 1);
        assert_eq!(get_bits(data[0x03], 5, 1), 1);

        let mut warnings = Vec::new();
        let decoded = decode_contact(&data, 0, &mut warnings).unwrap();
        assert_eq!(decoded, contact);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_cleared_image_decodes_empty() {
        let image = MemoryMap::new_filled(IMAGE_SIZE, FILL_BYTE);
        let result = codec().decode(&image).unwrap();
        assert!(result.config.channels().is_empty());
        assert!(result.config.contacts().is_empty());
        assert!(result.config.zones().is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let config = sample_config();
        let encoded = codec().encode(&config).unwrap();
        assert!(encoded.warnings.is_empty());
        let decoded = codec().decode(&encoded.image).unwrap();
        assert!(decoded.warnings.is_empty());
        let got = &decoded.config;

        assert_eq!(got.channels().len(), 3);
        assert_eq!(got.contacts().len(), 2);

        // Analog channel fields
        let (_, analog) = &got.channels()[0];
        assert_eq!(analog.name, "2m RPT");
        assert_eq!(analog.rx_hz, 145_600_000);
        assert_eq!(analog.tx_hz, 145_000_000);
        assert_eq!(analog.power, Power::Low);
        assert_eq!(analog.tx_timeout, 120);
        let settings = analog.as_analog().unwrap();
        assert_eq!(settings.admit, AnalogAdmit::Tone);
        assert_eq!(settings.squelch, 3);
        assert_eq!(settings.rx_tone, Some(Code::Ctcss(670)));
        assert_eq!(
            settings.tx_tone,
            Some(Code::Dcs {
                code: 23,
                inverted: true
            })
        );
        assert_eq!(settings.bandwidth, Bandwidth::Wide);

        // 70 cm pair survives exactly
        let (_, analog2) = &got.channels()[1];
        assert_eq!(analog2.rx_hz, 438_600_000);
        assert_eq!(analog2.tx_hz, 430_000_000);

        // Digital channel references resolve to the decoded entities
        let (_, digital) = &got.channels()[2];
        let settings = digital.as_digital().unwrap();
        assert_eq!(settings.color_code, 7);
        assert_eq!(settings.time_slot, TimeSlot::Ts2);
        let tx_contact = got.contact(settings.tx_contact.unwrap()).unwrap();
        assert_eq!(tx_contact.as_digital().unwrap().number, 8);
        let group = got.group_list(settings.group_list.unwrap()).unwrap();
        assert_eq!(group.name, "Local");
        assert_eq!(group.contacts.len(), 1);
        let radio_id = got.radio_id(settings.radio_id.unwrap()).unwrap();
        assert_eq!(radio_id.number, 2_623_001);
        assert_eq!(radio_id.name, "Primary");

        // GPS system: period and references covered, name synthesized
        let gps = &got.positioning()[0].1;
        assert_eq!(gps.period, 180);
        let dest = got.contact(gps.destination.unwrap()).unwrap();
        assert_eq!(dest.as_digital().unwrap().number, 2_623_001);
        assert_eq!(got.channel(gps.revert.unwrap()).unwrap().name, "TG8 TS2");
        assert_eq!(settings.positioning, Some(got.positioning()[0].0));

        // Scan list: members, priorities and TX policy
        let scan = &got.scan_lists()[0].1;
        assert_eq!(scan.name, "Main scan");
        assert_eq!(scan.members.len(), 3);
        assert_eq!(scan.members[1], ChannelRef::Selected);
        assert!(matches!(scan.priority, Some(ChannelRef::Channel(_))));
        assert_eq!(scan.secondary, Some(ChannelRef::Selected));
        match scan.tx {
            TxChannel::Channel(id) => assert_eq!(got.channel(id).unwrap().name, "70cm RPT"),
            other => panic!("unexpected TX policy {:?}", other),
        }
        assert_eq!(got.channels()[0].1.scan_list, Some(got.scan_lists()[0].0));

        // Zone VFO lists
        let zone = &got.zones()[0].1;
        assert_eq!(zone.name, "Home");
        assert_eq!(zone.a.len(), 2);
        assert_eq!(zone.b.len(), 1);
        assert_eq!(got.channel(zone.b[0]).unwrap().name, "70cm RPT");

        // Roaming membership
        let roam = &got.roaming()[0].1;
        assert_eq!(roam.channels.len(), 1);
        assert_eq!(got.channel(roam.channels[0]).unwrap().name, "TG8 TS2");
    }

    #[test]
    fn test_capacity_boundary_zones() {
        let mut config = Config::new();
        for i in 0..NUM_ZONES {
            config.add_zone(Zone::new(format!("Zone {}", i)));
        }
        assert!(codec().encode(&config).is_ok());

        config.add_zone(Zone::new("One too many"));
        match codec().encode(&config) {
            Err(CodecError::CapacityExceeded {
                table, capacity, ..
            }) => {
                assert_eq!(table, "zones");
                assert_eq!(capacity, NUM_ZONES);
            }
            other => panic!("expected CapacityExceeded, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_capacity_boundary_channels() {
        let mut config = Config::new();
        for i in 0..=NUM_CHANNELS {
            config.add_channel(Channel::analog(
                format!("CH{}", i),
                145_000_000,
                145_000_000,
            ));
        }
        match codec().encode(&config) {
            Err(CodecError::CapacityExceeded { table, .. }) => assert_eq!(table, "channels"),
            other => panic!("expected CapacityExceeded, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_color_code_out_of_range_is_fatal() {
        let mut config = Config::new();
        let ch = config.add_channel(Channel::digital("Bad", 438_600_000, 430_000_000));
        config
            .channel_mut(ch)
            .unwrap()
            .as_digital_mut()
            .unwrap()
            .color_code = 16;

        match codec().encode(&config) {
            Err(CodecError::FieldOutOfRange { field, name, .. }) => {
                assert_eq!(field, "color_code");
                assert_eq!(name, "Bad");
            }
            other => panic!("expected FieldOutOfRange, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_undersized_image_is_malformed() {
        let image = MemoryMap::new_filled(IMAGE_SIZE - 1, FILL_BYTE);
        assert!(matches!(
            codec().decode(&image),
            Err(CodecError::MalformedImage(_))
        ));
    }

    #[test]
    fn test_time_slot_boundary_skips_record() {
        let config = sample_config();
        let mut encoded = codec().encode(&config).unwrap();
        // The digital channel sits in slot 2; force time slot 3
        let offset = ADDR_CHANNELS + 2 * CHANNEL_SIZE + 0x02;
        let byte = encoded.image.get(offset, 1).unwrap()[0];
        let mut patched = byte;
        set_bits(&mut patched, 0, 2, 3);
        encoded.image.set_bytes(offset, &[patched]).unwrap();

        let decoded = codec().decode(&encoded.image).unwrap();
        assert_eq!(decoded.config.channels().len(), 2);
        assert!(decoded.warnings.iter().any(|w| matches!(
            w,
            CodecWarning::InvalidRecord { table: "channels", index: 2, .. }
        )));
    }

    #[test]
    fn test_unresolved_scan_list_reference() {
        let mut config = Config::new();
        config.add_channel(Channel::analog("A", 145_500_000, 145_500_000));
        let mut encoded = codec().encode(&config).unwrap();

        // Point the channel's scan list at an empty slot
        let offset = ADDR_CHANNELS + 0x14;
        encoded
            .image
            .set_bytes(offset, &200u16.to_le_bytes())
            .unwrap();

        let decoded = codec().decode(&encoded.image).unwrap();
        assert_eq!(decoded.config.channels()[0].1.scan_list, None);
        assert!(decoded.warnings.iter().any(|w| matches!(
            w,
            CodecWarning::UnresolvedReference {
                table: "scan lists",
                value: 199,
                ..
            }
        )));
    }

    #[test]
    fn test_skipped_slot_keeps_positions() {
        // Invalidate the record in channel slot 0 and check that a zone
        // reference to slot 2 still resolves to the third channel
        let config = sample_config();
        let mut encoded = codec().encode(&config).unwrap();
        encoded
            .image
            .fill_range(ADDR_CHANNELS, CHANNEL_SIZE, FILL_BYTE)
            .unwrap();

        let decoded = codec().decode(&encoded.image).unwrap();
        assert_eq!(decoded.config.channels().len(), 2);
        let zone = &decoded.config.zones()[0].1;
        // VFO A held slots 0 and 2; slot 0 is gone, slot 2 survives
        assert_eq!(zone.a.len(), 1);
        assert_eq!(
            decoded.config.channel(zone.a[0]).unwrap().name,
            "TG8 TS2"
        );
    }

    #[test]
    fn test_scan_list_removal_encodes_none_sentinel() {
        let mut config = Config::new();
        let scan = config.add_scan_list(ScanList::new("Scan"));
        let ch = config.add_channel(Channel::analog("A", 145_500_000, 145_500_000));
        config.channel_mut(ch).unwrap().scan_list = Some(scan);
        config.remove_scan_list(scan);

        let encoded = codec().encode(&config).unwrap();
        assert!(encoded.warnings.is_empty());
        let field = encoded.image.get(ADDR_CHANNELS + 0x14, 2).unwrap();
        assert_eq!(field, &[0, 0]);
    }

    #[test]
    fn test_dtmf_contact_reported_unsupported() {
        let mut config = Config::new();
        config.add_contact(Contact::Dtmf(crate::core::contact::DtmfContact {
            name: "Echolink".into(),
            digits: "*123#".into(),
            rx_tone: false,
        }));
        config.add_contact(Contact::group("TG9", 9));

        let encoded = codec().encode(&config).unwrap();
        assert!(encoded
            .warnings
            .iter()
            .any(|w| matches!(w, CodecWarning::Unsupported { .. })));

        // The digital contact takes slot 0
        let decoded = codec().decode(&encoded.image).unwrap();
        assert_eq!(decoded.config.contacts().len(), 1);
        assert_eq!(decoded.config.contacts()[0].1.name(), "TG9");
    }

    #[test]
    fn test_empty_zone_name_is_fatal() {
        let mut config = Config::new();
        config.add_zone(Zone::new(""));
        assert!(matches!(
            codec().encode(&config),
            Err(CodecError::EmptyName { entity: "zone" })
        ));
    }
}
