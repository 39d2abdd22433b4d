//! Main decoding functions for SCTE-35 messages.
//!
//! [`decode`] walks a complete splice information section: it validates the
//! fixed header, hands the splice command and descriptor loop to their own
//! decoders over bounded [`BitCursor`] windows, and extracts the CRC trailer.
//! The first malformed field aborts the whole message.

use log::{debug, warn};

use crate::bit_reader::BitCursor;
use crate::descriptors::{
    AudioComponent, AudioDescriptor, AvailDescriptor, CUEI_IDENTIFIER, DeviceRestrictions,
    DtmfDescriptor, PidComponent, Restrictions, SegmentationAdditionalInfo,
    SegmentationDescriptor, SegmentationTypeId, SpliceDescriptor, TimeDescriptor,
};
use crate::error::{CommandKind, DecodeError, DecodeResult, DescriptorKind, Malformation};
use crate::time::{BreakDuration, SpliceTime};
use crate::types::{
    EncryptionAlgorithm, InsertComponent, InsertEvent, InsertEventInformation, ScheduleComponent,
    ScheduleEvent, ScheduleEventInformation, ScheduleInfo, SpliceCommand, SpliceInfoSection, Tier,
};
use crate::upid::parse_segmentation_upid;

/// Every section must carry at least this many bits before any field is read.
pub const MIN_SECTION_BITS: usize = 200;
/// Largest `section_length` a splice information section may declare.
pub const MAX_SECTION_LENGTH: u16 = 4093;
/// The only table id SCTE-35 uses.
pub const SPLICE_INFO_TABLE_ID: u8 = 0xFC;
/// Legacy `splice_command_length` marker standing for a 20-byte command.
const LEGACY_COMMAND_LENGTH: u16 = 0xFFF;
const LEGACY_COMMAND_BYTES: u16 = 20;

/// Decodes a complete SCTE-35 splice information section from binary data.
///
/// This is the main entry point. The buffer must hold exactly one section,
/// from the table id through the CRC-32 trailer. The CRC is extracted but not
/// verified; see [`SpliceInfoSection::verify_crc`] for that.
///
/// # Supported Command Types
///
/// - `0x00` - Splice Null
/// - `0x04` - Splice Schedule
/// - `0x05` - Splice Insert
/// - `0x06` - Time Signal
/// - `0x07` - Bandwidth Reservation
/// - `0xFF` - Private Command
///
/// Other command types decode as [`SpliceCommand::Reserved`].
///
/// # Example
///
/// ```rust
/// use data_encoding::BASE64;
/// use scte35_decoder::{decode, SpliceCommand};
///
/// let buffer = BASE64
///     .decode(b"/DAvAAAAAAAAAP///wViAAWKf+//CXVCAv4AUmXAAzUAAAAKAAhDVUVJADgyMWLvc/g=")
///     .unwrap();
/// let section = decode(&buffer).unwrap();
/// assert!(matches!(section.splice_command, SpliceCommand::Insert(_)));
/// assert_eq!(section.crc_32, "0x62EF73F8");
/// ```
///
/// # Errors
///
/// Returns a [`DecodeError`] naming the first field category that failed.
pub fn decode(buffer: &[u8]) -> DecodeResult<SpliceInfoSection> {
    let total_bits = buffer.len() * 8;
    if total_bits < MIN_SECTION_BITS {
        return Err(DecodeError::TooShort { bits: total_bits });
    }

    let mut cursor = BitCursor::new(buffer);

    let table_id = cursor.take_uint(8)? as u8;
    if table_id != SPLICE_INFO_TABLE_ID {
        return Err(DecodeError::BadTableId(table_id));
    }

    let section_syntax_indicator = cursor.take_flag()?;
    let private_indicator = cursor.take_flag()?;
    let sap_type = cursor.take_uint(2)? as u8;
    let section_length = cursor.take_uint(12)? as u16;
    if 24 + section_length as usize * 8 != total_bits || section_length > MAX_SECTION_LENGTH {
        return Err(DecodeError::BadSectionLength {
            section_length,
            total_bits,
        });
    }

    let protocol_version = cursor.take_uint(8)? as u8;
    if protocol_version != 0 {
        return Err(DecodeError::UnsupportedProtocolVersion(protocol_version));
    }

    let encrypted_packet = cursor.take_flag()?;
    let encryption_code = cursor.take_uint(6)? as u8;
    let encryption_algorithm = EncryptionAlgorithm::from_code(encryption_code)
        .ok_or(DecodeError::UnknownEncryptionAlgorithm(encryption_code))?;
    let pts_adjustment = cursor.take_uint(33)?;
    let cw_index = cursor.take_uint(8)? as u8;
    let tier = Tier(cursor.take_uint(12)? as u16);

    let mut splice_command_length = cursor.take_uint(12)? as u16;
    if splice_command_length == LEGACY_COMMAND_LENGTH {
        debug!("legacy splice_command_length 0xFFF, assuming {LEGACY_COMMAND_BYTES} bytes");
        splice_command_length = LEGACY_COMMAND_BYTES;
    }
    let splice_command_type = cursor.take_uint(8)? as u8;
    let command_bits = cursor.take_slice(splice_command_length as usize * 8)?;
    let splice_command = parse_splice_command(splice_command_type, command_bits)?;

    // descriptor_loop_length plus the CRC trailer
    if cursor.remaining() < 48 {
        return Err(DecodeError::BadSectionLength {
            section_length,
            total_bits,
        });
    }

    let descriptor_loop_length = cursor.take_uint(16)? as u16;
    let descriptor_bits = cursor.take_slice(descriptor_loop_length as usize * 8)?;
    let splice_descriptors = parse_splice_descriptors(descriptor_bits)?;

    let trailer_bits = if encrypted_packet { 64 } else { 32 };
    if cursor.remaining() < trailer_bits {
        return Err(DecodeError::BadSectionLength {
            section_length,
            total_bits,
        });
    }

    debug!(
        "decoded {} command with {} descriptor(s)",
        splice_command.name(),
        splice_descriptors.len()
    );

    let (e_crc_32, crc_32) = read_crc_trailer(buffer, encrypted_packet)?;

    Ok(SpliceInfoSection {
        table_id,
        section_syntax_indicator,
        private_indicator,
        sap_type,
        section_length,
        protocol_version,
        encrypted_packet,
        encryption_algorithm,
        pts_adjustment,
        cw_index,
        tier,
        splice_command_length,
        splice_command_type,
        splice_command,
        descriptor_loop_length,
        splice_descriptors,
        e_crc_32,
        crc_32,
    })
}

/// Reads the CRC-32 from the last four bytes, and the encrypted CRC from the
/// four before them when the packet is encrypted.
fn read_crc_trailer(
    buffer: &[u8],
    encrypted_packet: bool,
) -> DecodeResult<(Option<String>, String)> {
    let trailer_bytes = if encrypted_packet { 8 } else { 4 };
    let start = buffer.len().saturating_sub(trailer_bytes);
    let mut trailer = BitCursor::new(&buffer[start..]);

    let e_crc_32 = if encrypted_packet {
        Some(format_crc(trailer.take_uint(32)? as u32))
    } else {
        None
    };
    let crc_32 = format_crc(trailer.take_uint(32)? as u32);
    Ok((e_crc_32, crc_32))
}

fn format_crc(value: u32) -> String {
    format!("0x{value:08X}")
}

fn malformed_command(kind: CommandKind) -> impl FnOnce(Malformation) -> DecodeError {
    move |reason| DecodeError::MalformedCommand { kind, reason }
}

fn malformed_descriptor(kind: DescriptorKind) -> impl FnOnce(Malformation) -> DecodeError {
    move |reason| DecodeError::MalformedDescriptor { kind, reason }
}

/// Decodes the splice command held in `bits` according to its type code.
fn parse_splice_command(command_type: u8, bits: BitCursor<'_>) -> DecodeResult<SpliceCommand> {
    match command_type {
        0x00 => Ok(SpliceCommand::Null),
        0x04 => parse_splice_schedule(bits)
            .map(SpliceCommand::Schedule)
            .map_err(malformed_command(CommandKind::Schedule)),
        0x05 => parse_splice_insert(bits)
            .map(SpliceCommand::Insert)
            .map_err(malformed_command(CommandKind::Insert)),
        0x06 => {
            let mut bits = bits;
            parse_splice_time(&mut bits)
                .map(SpliceCommand::TimeSignal)
                .map_err(malformed_command(CommandKind::TimeSignal))
        }
        0x07 => Ok(SpliceCommand::BandwidthReservation),
        0xFF => Ok(SpliceCommand::PrivateCommand),
        other => {
            debug!("reserved splice command type 0x{other:02X}");
            Ok(SpliceCommand::Reserved)
        }
    }
}

fn parse_splice_time(bits: &mut BitCursor<'_>) -> Result<SpliceTime, Malformation> {
    let time_specified_flag = bits.take_flag()?;
    if time_specified_flag {
        bits.skip(6)?;
        let pts_time = bits.take_uint(33)?;
        Ok(SpliceTime::from_ticks(pts_time))
    } else {
        bits.skip(7)?;
        Ok(SpliceTime::default())
    }
}

fn parse_break_duration(bits: &mut BitCursor<'_>) -> Result<BreakDuration, Malformation> {
    let auto_return = bits.take_flag()?;
    bits.skip(6)?;
    let duration = bits.take_uint(33)?;
    Ok(BreakDuration {
        auto_return,
        duration,
    })
}

fn parse_splice_insert(mut bits: BitCursor<'_>) -> Result<InsertEvent, Malformation> {
    let splice_event_id = bits.take_uint(32)? as u32;
    let splice_event_cancel_indicator = bits.take_flag()?;
    bits.skip(7)?;

    let information = if splice_event_cancel_indicator {
        None
    } else {
        Some(parse_insert_event_information(bits)?)
    };

    Ok(InsertEvent {
        splice_event_id,
        splice_event_cancel_indicator,
        information,
    })
}

fn parse_insert_event_information(
    mut bits: BitCursor<'_>,
) -> Result<InsertEventInformation, Malformation> {
    let out_of_network_indicator = bits.take_flag()?;
    let program_splice_flag = bits.take_flag()?;
    let duration_flag = bits.take_flag()?;
    let splice_immediate_flag = bits.take_flag()?;
    bits.skip(4)?;

    let mut splice_time = None;
    let mut components = None;
    if program_splice_flag && !splice_immediate_flag {
        splice_time = Some(parse_splice_time(&mut bits)?);
    } else if !program_splice_flag {
        let component_count = bits.take_uint(16)? as usize;
        let mut list = Vec::new();
        for _ in 0..component_count {
            let component_tag = bits.take_uint(8)? as u8;
            let splice_time = if splice_immediate_flag {
                None
            } else {
                Some(parse_splice_time(&mut bits)?)
            };
            list.push(InsertComponent {
                component_tag,
                splice_time,
            });
        }
        components = Some(list);
    }

    let break_duration = if duration_flag {
        Some(parse_break_duration(&mut bits)?)
    } else {
        None
    };

    if bits.remaining() != 32 {
        return Err(Malformation::TrailingBits {
            expected: 32,
            actual: bits.remaining(),
        });
    }
    let unique_program_id = bits.take_uint(16)? as u16;
    let avail_num = bits.take_uint(8)? as u8;
    let avails_expected = bits.take_uint(8)? as u8;

    Ok(InsertEventInformation {
        out_of_network_indicator,
        program_splice_flag,
        duration_flag,
        splice_immediate_flag,
        splice_time,
        components,
        break_duration,
        unique_program_id,
        avail_num,
        avails_expected,
    })
}

/// Smallest schedule event: id, cancel flag and reserved bits.
const MIN_SCHEDULE_EVENT_BITS: usize = 40;

fn parse_splice_schedule(mut bits: BitCursor<'_>) -> Result<ScheduleInfo, Malformation> {
    let splice_count = bits.take_uint(8)? as usize;
    if splice_count == 0 {
        return Ok(ScheduleInfo::default());
    }
    if bits.remaining() < MIN_SCHEDULE_EVENT_BITS {
        warn!(
            "splice_schedule declares {splice_count} event(s) but only {} bits follow; returning no events",
            bits.remaining()
        );
        return Ok(ScheduleInfo::default());
    }

    let mut events = Vec::with_capacity(splice_count);
    for _ in 0..splice_count {
        if bits.is_empty() {
            break;
        }
        events.push(parse_schedule_event(&mut bits)?);
    }
    Ok(ScheduleInfo { events })
}

fn parse_schedule_event(bits: &mut BitCursor<'_>) -> Result<ScheduleEvent, Malformation> {
    let splice_event_id = bits.take_uint(32)? as u32;
    let splice_event_cancel_indicator = bits.take_flag()?;
    bits.skip(7)?;

    if splice_event_cancel_indicator {
        return Ok(ScheduleEvent {
            splice_event_id,
            splice_event_cancel_indicator,
            information: None,
        });
    }

    let out_of_network_indicator = bits.take_flag()?;
    let program_splice_flag = bits.take_flag()?;
    let duration_flag = bits.take_flag()?;
    bits.skip(5)?;

    let mut utc_splice_time = None;
    let mut components = None;
    if program_splice_flag {
        utc_splice_time = Some(bits.take_uint(32)? as u32);
    } else {
        let component_count = bits.take_uint(8)? as usize;
        let mut list = Vec::with_capacity(component_count);
        for _ in 0..component_count {
            list.push(ScheduleComponent {
                component_tag: bits.take_uint(8)? as u8,
                utc_splice_time: bits.take_uint(32)? as u32,
            });
        }
        components = Some(list);
    }

    let break_duration = if duration_flag {
        Some(parse_break_duration(bits)?)
    } else {
        None
    };

    let unique_program_id = bits.take_uint(16)? as u16;
    let avail_num = bits.take_uint(8)? as u8;
    let avails_expected = bits.take_uint(8)? as u8;

    Ok(ScheduleEvent {
        splice_event_id,
        splice_event_cancel_indicator,
        information: Some(ScheduleEventInformation {
            out_of_network_indicator,
            program_splice_flag,
            duration_flag,
            utc_splice_time,
            components,
            break_duration,
            unique_program_id,
            avail_num,
            avails_expected,
        }),
    })
}

/// Decodes every descriptor in the loop, skipping reserved tags and entries
/// whose body is empty.
fn parse_splice_descriptors(mut bits: BitCursor<'_>) -> DecodeResult<Vec<SpliceDescriptor>> {
    let mut descriptors = Vec::new();

    while !bits.is_empty() {
        if bits.remaining() < 16 {
            return Err(DecodeError::MalformedDescriptor {
                kind: DescriptorKind::Unknown,
                reason: Malformation::ShortDescriptorLoop(bits.remaining()),
            });
        }
        let tag = bits.take_uint(8)? as u8;
        let length = bits.take_uint(8)? as u8;
        let kind = DescriptorKind::from_tag(tag);
        let body = bits
            .take_slice(length as usize * 8)
            .map_err(|u| malformed_descriptor(kind)(u.into()))?;

        if body.is_empty() {
            warn!("skipping splice descriptor 0x{tag:02X} with an empty body");
            continue;
        }

        let descriptor = match kind {
            DescriptorKind::Avail => parse_avail_descriptor(length, body).map(SpliceDescriptor::Avail),
            DescriptorKind::Dtmf => parse_dtmf_descriptor(body).map(SpliceDescriptor::Dtmf),
            DescriptorKind::Segmentation => {
                parse_segmentation_descriptor(body).map(SpliceDescriptor::Segmentation)
            }
            DescriptorKind::Time => parse_time_descriptor(length, body).map(SpliceDescriptor::Time),
            DescriptorKind::Audio => parse_audio_descriptor(body).map(SpliceDescriptor::Audio),
            DescriptorKind::Unknown => {
                debug!("skipping reserved splice descriptor tag 0x{tag:02X} ({length} bytes)");
                continue;
            }
        };
        descriptors.push(descriptor.map_err(malformed_descriptor(kind))?);
    }

    Ok(descriptors)
}

fn take_cuei(bits: &mut BitCursor<'_>) -> Result<u32, Malformation> {
    let identifier = bits.take_uint(32)? as u32;
    if identifier != CUEI_IDENTIFIER {
        return Err(Malformation::BadIdentifier(identifier));
    }
    Ok(identifier)
}

fn expect_length(length: u8, expected: usize) -> Result<(), Malformation> {
    if length as usize != expected {
        return Err(Malformation::WrongLength {
            expected,
            actual: length as usize,
        });
    }
    Ok(())
}

fn parse_avail_descriptor(
    length: u8,
    mut bits: BitCursor<'_>,
) -> Result<AvailDescriptor, Malformation> {
    expect_length(length, 8)?;
    let identifier = take_cuei(&mut bits)?;
    let provider_avail_id = bits.take_uint(32)? as u32;
    Ok(AvailDescriptor {
        identifier,
        provider_avail_id,
    })
}

fn parse_dtmf_descriptor(mut bits: BitCursor<'_>) -> Result<DtmfDescriptor, Malformation> {
    let identifier = take_cuei(&mut bits)?;
    let preroll = bits.take_uint(8)? as u8;
    let dtmf_count = bits.take_uint(3)? as usize;
    bits.skip(5)?;

    let mut dtmf_chars = String::with_capacity(dtmf_count);
    for _ in 0..dtmf_count {
        dtmf_chars.push(char::from(bits.take_uint(8)? as u8));
    }

    Ok(DtmfDescriptor {
        identifier,
        preroll,
        dtmf_chars,
    })
}

fn parse_time_descriptor(
    length: u8,
    mut bits: BitCursor<'_>,
) -> Result<TimeDescriptor, Malformation> {
    expect_length(length, 16)?;
    Ok(TimeDescriptor {
        identifier: bits.take_uint(32)? as u32,
        tai_seconds: bits.take_uint(48)?,
        tai_ns: bits.take_uint(32)? as u32,
        utc_offset: bits.take_uint(16)? as u16,
    })
}

fn parse_audio_descriptor(mut bits: BitCursor<'_>) -> Result<AudioDescriptor, Malformation> {
    let identifier = take_cuei(&mut bits)?;
    let audio_count = bits.take_uint(4)? as usize;
    bits.skip(4)?;

    let mut components = Vec::with_capacity(audio_count);
    for _ in 0..audio_count {
        let component_tag = bits.take_uint(8)? as u8;
        let iso_code = crate::codec::bits_to_ascii(bits.take_slice(24)?)?;
        let bit_stream_mode = bits.take_uint(3)? as u8;
        let num_channels = bits.take_uint(4)? as u8;
        let full_srvc_audio = bits.take_flag()?;
        components.push(AudioComponent {
            component_tag,
            iso_code,
            bit_stream_mode,
            num_channels,
            full_srvc_audio,
        });
    }

    Ok(AudioDescriptor {
        identifier,
        components,
    })
}

fn parse_segmentation_descriptor(
    mut bits: BitCursor<'_>,
) -> Result<SegmentationDescriptor, Malformation> {
    let identifier = take_cuei(&mut bits)?;
    let segmentation_event_id = bits.take_uint(32)? as u32;
    let segmentation_event_cancel_indicator = bits.take_flag()?;
    bits.skip(7)?;

    let information = if segmentation_event_cancel_indicator {
        None
    } else {
        Some(parse_segmentation_additional_info(bits)?)
    };

    Ok(SegmentationDescriptor {
        identifier,
        segmentation_event_id,
        segmentation_event_cancel_indicator,
        information,
    })
}

fn parse_segmentation_additional_info(
    mut bits: BitCursor<'_>,
) -> Result<SegmentationAdditionalInfo, Malformation> {
    let program_segmentation_flag = bits.take_flag()?;
    let segmentation_duration_flag = bits.take_flag()?;
    let delivery_not_restricted_flag = bits.take_flag()?;

    let restrictions = if delivery_not_restricted_flag {
        bits.skip(5)?;
        None
    } else {
        Some(Restrictions {
            web_delivery_allowed: bits.take_flag()?,
            no_regional_blackout: bits.take_flag()?,
            archive_allowed: bits.take_flag()?,
            device_restrictions: DeviceRestrictions::from_bits(bits.take_uint(2)? as u8),
        })
    };

    let components = if program_segmentation_flag {
        None
    } else {
        let component_count = bits.take_uint(8)? as usize;
        let mut list = Vec::with_capacity(component_count);
        for _ in 0..component_count {
            let component_tag = bits.take_uint(8)? as u8;
            bits.skip(7)?;
            let pts_offset = bits.take_uint(33)?;
            list.push(PidComponent {
                component_tag,
                pts_offset,
            });
        }
        Some(list)
    };

    let segmentation_duration = if segmentation_duration_flag {
        Some(bits.take_uint(40)?)
    } else {
        None
    };

    let upid_type = bits.take_uint(8)? as u8;
    let upid_length = bits.take_uint(8)? as u8;
    let upid_bits = bits.take_slice(upid_length as usize * 8)?;
    let segmentation_upid = parse_segmentation_upid(upid_type, upid_length, upid_bits)?;

    let type_id = bits.take_uint(8)? as u8;
    let segmentation_type_id = SegmentationTypeId::from_id(type_id)
        .ok_or(Malformation::UnknownSegmentationType(type_id))?;
    let segment_num = bits.take_uint(8)? as u8;
    let segments_expected = bits.take_uint(8)? as u8;

    let (sub_segment_num, sub_segments_expected) = if segmentation_type_id.has_sub_segments() {
        match bits.remaining() {
            0 => (Some(0), Some(0)),
            16 => (
                Some(bits.take_uint(8)? as u8),
                Some(bits.take_uint(8)? as u8),
            ),
            actual => {
                return Err(Malformation::TrailingBits {
                    expected: 16,
                    actual,
                });
            }
        }
    } else {
        (None, None)
    };

    Ok(SegmentationAdditionalInfo {
        program_segmentation_flag,
        segmentation_duration_flag,
        delivery_not_restricted_flag,
        restrictions,
        components,
        segmentation_duration,
        segmentation_upid,
        segmentation_type_id,
        segment_num,
        segments_expected,
        sub_segment_num,
        sub_segments_expected,
    })
}
