//! Core SCTE-35 data structures.
//!
//! This module contains the decoded splice information section together with
//! its header enumerations and the splice command tree. Descriptor types live
//! in [`crate::descriptors`] and UPID types in [`crate::upid`].

use crate::descriptors::SpliceDescriptor;
use crate::time::{BreakDuration, SpliceTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fully decoded SCTE-35 splice information section.
///
/// This is the top-level structure produced by [`decode`](crate::decode). It
/// is built once from a complete message and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpliceInfoSection {
    /// Table identifier, always 0xFC
    pub table_id: u8,
    /// Section syntax indicator (0 for MPEG short sections)
    pub section_syntax_indicator: bool,
    /// Private indicator
    pub private_indicator: bool,
    /// SAP (Stream Access Point) type, 2 bits
    pub sap_type: u8,
    /// Number of bytes following the `section_length` field, CRC included
    pub section_length: u16,
    /// SCTE-35 protocol version, always 0
    pub protocol_version: u8,
    /// Set when part of the message is encrypted
    pub encrypted_packet: bool,
    /// Encryption algorithm signalled by the 6-bit code
    pub encryption_algorithm: EncryptionAlgorithm,
    /// PTS adjustment in 90 kHz ticks (33 bits)
    pub pts_adjustment: u64,
    /// Control word index for decryption
    pub cw_index: u8,
    /// Authorization tier (12 bits)
    pub tier: Tier,
    /// Length of the splice command in bytes. The legacy 0xFFF marker is
    /// reported as the 20 bytes it stands for.
    pub splice_command_length: u16,
    /// Splice command type code
    pub splice_command_type: u8,
    /// The decoded splice command
    pub splice_command: SpliceCommand,
    /// Length of the descriptor loop in bytes
    pub descriptor_loop_length: u16,
    /// Decoded descriptors, in message order
    pub splice_descriptors: Vec<SpliceDescriptor>,
    /// Encrypted CRC-32 as `0x` hex text, present when `encrypted_packet` is set
    pub e_crc_32: Option<String>,
    /// CRC-32 trailer as `0x` hex text
    pub crc_32: String,
}

/// Encryption algorithm signalled in the section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EncryptionAlgorithm {
    /// No encryption (0)
    NotEncrypted,
    /// DES in ECB mode (1)
    DesEcb,
    /// DES in CBC mode (2)
    DesCbc,
    /// Triple DES EDE3 in ECB mode (3)
    TripleDesEde3,
    /// Reserved codes (4-31)
    Reserved(u8),
    /// User private codes (32-63)
    UserPrivate(u8),
}

impl EncryptionAlgorithm {
    /// Maps a 6-bit algorithm code; returns `None` above 63.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => EncryptionAlgorithm::NotEncrypted,
            1 => EncryptionAlgorithm::DesEcb,
            2 => EncryptionAlgorithm::DesCbc,
            3 => EncryptionAlgorithm::TripleDesEde3,
            4..=31 => EncryptionAlgorithm::Reserved(code),
            32..=63 => EncryptionAlgorithm::UserPrivate(code),
            _ => return None,
        })
    }

    /// The 6-bit wire code.
    pub fn code(&self) -> u8 {
        match self {
            EncryptionAlgorithm::NotEncrypted => 0,
            EncryptionAlgorithm::DesEcb => 1,
            EncryptionAlgorithm::DesCbc => 2,
            EncryptionAlgorithm::TripleDesEde3 => 3,
            EncryptionAlgorithm::Reserved(code) | EncryptionAlgorithm::UserPrivate(code) => *code,
        }
    }

    /// Human-readable name.
    pub fn description(&self) -> &'static str {
        match self {
            EncryptionAlgorithm::NotEncrypted => "No encryption",
            EncryptionAlgorithm::DesEcb => "DES - ECB mode",
            EncryptionAlgorithm::DesCbc => "DES - CBC mode",
            EncryptionAlgorithm::TripleDesEde3 => "Triple DES EDE3 - ECB mode",
            EncryptionAlgorithm::Reserved(_) => "Reserved",
            EncryptionAlgorithm::UserPrivate(_) => "User private",
        }
    }
}

/// The 12-bit authorization tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tier(pub u16);

impl Tier {
    /// The tier value.
    pub fn value(&self) -> u16 {
        self.0
    }

    /// `0x` followed by uppercase hex, e.g. `0xFFF`.
    pub fn hex_representation(&self) -> String {
        format!("0x{:X}", self.0)
    }
}

/// The splice command carried by a section, selected by its type code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum SpliceCommand {
    /// `splice_null()` (0x00)
    Null,
    /// `splice_schedule()` (0x04)
    Schedule(ScheduleInfo),
    /// `splice_insert()` (0x05)
    Insert(InsertEvent),
    /// `time_signal()` (0x06)
    TimeSignal(SpliceTime),
    /// `bandwidth_reservation()` (0x07)
    BandwidthReservation,
    /// `private_command()` (0xFF)
    PrivateCommand,
    /// Any other type code; no payload is interpreted.
    Reserved,
}

impl SpliceCommand {
    /// Short name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            SpliceCommand::Null => "SpliceNull",
            SpliceCommand::Schedule(_) => "SpliceSchedule",
            SpliceCommand::Insert(_) => "SpliceInsert",
            SpliceCommand::TimeSignal(_) => "TimeSignal",
            SpliceCommand::BandwidthReservation => "BandwidthReservation",
            SpliceCommand::PrivateCommand => "PrivateCommand",
            SpliceCommand::Reserved => "Reserved",
        }
    }
}

/// A `splice_insert()` command.
///
/// Signals the start or end of an ad break or other network insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InsertEvent {
    /// Unique identifier for this splice event
    pub splice_event_id: u32,
    /// Set when a previously sent event with this id is cancelled
    pub splice_event_cancel_indicator: bool,
    /// Event details, absent when the event is cancelled
    pub information: Option<InsertEventInformation>,
}

/// The body of a non-cancelled `splice_insert()`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InsertEventInformation {
    /// Set when leaving the network feed, clear when returning to it
    pub out_of_network_indicator: bool,
    /// Set for a program splice, clear for a per-component splice
    pub program_splice_flag: bool,
    /// Set when a break duration follows
    pub duration_flag: bool,
    /// Set when the splice happens at the nearest opportunity
    pub splice_immediate_flag: bool,
    /// Program splice time, present for a timed program splice
    pub splice_time: Option<SpliceTime>,
    /// Per-component splice times, present for a component splice
    pub components: Option<Vec<InsertComponent>>,
    /// Break duration, present when `duration_flag` is set
    pub break_duration: Option<BreakDuration>,
    /// Unique identifier for the viewing event
    pub unique_program_id: u16,
    /// Identifies this avail within the break
    pub avail_num: u8,
    /// Number of avails expected in the break
    pub avails_expected: u8,
}

/// One component of a component-mode `splice_insert()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InsertComponent {
    /// Elementary stream component tag
    pub component_tag: u8,
    /// Splice time, absent when splicing immediately
    pub splice_time: Option<SpliceTime>,
}

/// A `splice_schedule()` command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleInfo {
    /// Scheduled events, in message order
    pub events: Vec<ScheduleEvent>,
}

/// One event of a `splice_schedule()` command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleEvent {
    /// Unique identifier for this splice event
    pub splice_event_id: u32,
    /// Set when a previously sent event with this id is cancelled
    pub splice_event_cancel_indicator: bool,
    /// Event details, absent when the event is cancelled
    pub information: Option<ScheduleEventInformation>,
}

/// The body of a non-cancelled schedule event. Times are UTC seconds since
/// 1980-01-06 rather than PTS ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleEventInformation {
    pub out_of_network_indicator: bool,
    pub program_splice_flag: bool,
    pub duration_flag: bool,
    /// Program splice time, present for a program splice
    pub utc_splice_time: Option<u32>,
    /// Per-component splice times, present for a component splice
    pub components: Option<Vec<ScheduleComponent>>,
    pub break_duration: Option<BreakDuration>,
    pub unique_program_id: u16,
    pub avail_num: u8,
    pub avails_expected: u8,
}

/// One 40-bit component entry of a schedule event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleComponent {
    pub component_tag: u8,
    pub utc_splice_time: u32,
}
