use std::process;

use clap::{Parser, ValueEnum};
use log::debug;
use serde_json::json;

use scte35_decoder::fmt::{format_identifier_to_string, format_ticks};
use scte35_decoder::transport::{base64_to_bytes, hex_to_bytes};
use scte35_decoder::{
    DecodeError, InsertEvent, ScheduleEvent, SegmentationDescriptor, SpliceCommand,
    SpliceDescriptor, SpliceInfoSection, decode,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Decode SCTE-35 splice information sections from base64 or hex payloads",
    long_about = None
)]
struct Cli {
    /// Base64 or hex encoded SCTE-35 payload
    payload: String,

    /// Payload encoding; auto picks hex when the payload starts with 0x
    #[arg(short, long, value_enum, default_value_t = InputFormat::Auto)]
    input: InputFormat,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Verify the CRC-32 trailer against the message
    #[arg(long)]
    verify_crc: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Auto,
    Base64,
    Hex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let payload = cli.payload.trim();
    let is_hex = match cli.input {
        InputFormat::Hex => true,
        InputFormat::Base64 => false,
        InputFormat::Auto => payload.starts_with("0x") || payload.starts_with("0X"),
    };
    debug!("reading payload as {}", if is_hex { "hex" } else { "base64" });

    let converted = if is_hex {
        hex_to_bytes(payload)
    } else {
        base64_to_bytes(payload)
    };
    let buffer = match converted {
        Ok(buffer) => buffer,
        Err(DecodeError::MalformedInputText { encoding, message }) => fail(
            cli.output,
            format!("Error decoding {encoding} string: {message}"),
        ),
        Err(e) => fail(cli.output, format!("Error decoding payload: {e}")),
    };

    let section = match decode(&buffer) {
        Ok(section) => section,
        Err(e) => fail(
            cli.output,
            format!("Error decoding splice info section: {e}"),
        ),
    };

    let crc_valid = if cli.verify_crc {
        match section.verify_crc(&buffer) {
            Ok(valid) => Some(valid),
            Err(e) => fail(cli.output, format!("Error verifying CRC-32: {e}")),
        }
    } else {
        None
    };

    match cli.output {
        OutputFormat::Json => {
            let mut result = json!({
                "status": "success",
                "data": section,
            });
            if let Some(valid) = crc_valid {
                result["crc_valid"] = json!(valid);
            }
            match serde_json::to_string_pretty(&result) {
                Ok(text) => println!("{text}"),
                Err(e) => fail(cli.output, format!("Error serializing result: {e}")),
            }
        }
        OutputFormat::Text => print_section(&section, crc_valid),
    }
}

fn fail(output: OutputFormat, message: String) -> ! {
    match output {
        OutputFormat::Json => println!("{}", json!({ "status": "error", "error": message })),
        OutputFormat::Text => eprintln!("{message}"),
    }
    process::exit(1);
}

fn print_section(section: &SpliceInfoSection, crc_valid: Option<bool>) {
    println!("Successfully parsed SpliceInfoSection:");
    println!("  Table ID: {}", section.table_id);
    println!("  Section Syntax Indicator: {}", section.section_syntax_indicator);
    println!("  Private Indicator: {}", section.private_indicator);
    println!("  SAP Type: {}", section.sap_type);
    println!("  Section Length: {}", section.section_length);
    println!("  Protocol Version: {}", section.protocol_version);
    println!("  Encrypted Packet: {}", section.encrypted_packet);
    println!(
        "  Encryption Algorithm: {}",
        section.encryption_algorithm.description()
    );
    println!("  PTS Adjustment: {}", format_ticks(section.pts_adjustment));
    println!("  CW Index: {}", section.cw_index);
    println!("  Tier: {}", section.tier.hex_representation());
    println!("  Splice Command Type: 0x{:02X}", section.splice_command_type);
    println!("  Splice Command Length: {}", section.splice_command_length);
    println!("  Splice Command: {}", section.splice_command.name());

    match &section.splice_command {
        SpliceCommand::Schedule(schedule) => {
            println!("    Splice Count: {}", schedule.events.len());
            for event in &schedule.events {
                print_schedule_event(event);
            }
        }
        SpliceCommand::Insert(insert) => print_insert(insert),
        SpliceCommand::TimeSignal(time) => match time.pts_time {
            Some(pts) => println!("    PTS Time: {}", format_ticks(pts)),
            None => println!("    PTS Time: not specified"),
        },
        SpliceCommand::Null
        | SpliceCommand::BandwidthReservation
        | SpliceCommand::PrivateCommand
        | SpliceCommand::Reserved => {}
    }

    println!("  Descriptor Loop Length: {}", section.descriptor_loop_length);
    println!("  Number of Descriptors: {}", section.splice_descriptors.len());
    for descriptor in &section.splice_descriptors {
        print_descriptor(descriptor);
    }

    if let Some(crc) = &section.e_crc_32 {
        println!("  Encrypted CRC-32: {crc}");
    }
    println!("  CRC-32: {}", section.crc_32);
    if let Some(valid) = crc_valid {
        println!("  CRC-32 Valid: {valid}");
    }
}

fn print_insert(insert: &InsertEvent) {
    println!(
        "    Splice Event ID: 0x{:08x} ({})",
        insert.splice_event_id, insert.splice_event_id
    );
    println!(
        "    Splice Event Cancel: {}",
        insert.splice_event_cancel_indicator
    );
    let Some(info) = &insert.information else {
        return;
    };
    println!("    Out of Network: {}", info.out_of_network_indicator);
    println!("    Program Splice Flag: {}", info.program_splice_flag);
    println!("    Duration Flag: {}", info.duration_flag);
    println!("    Splice Immediate Flag: {}", info.splice_immediate_flag);
    if let Some(pts) = info.splice_time.and_then(|time| time.pts_time) {
        println!("    Splice Time PTS: {}", format_ticks(pts));
    }
    for component in info.components.iter().flatten() {
        match component.splice_time.and_then(|time| time.pts_time) {
            Some(pts) => println!(
                "    Component 0x{:02X}: {}",
                component.component_tag,
                format_ticks(pts)
            ),
            None => println!("    Component 0x{:02X}", component.component_tag),
        }
    }
    if let Some(duration) = &info.break_duration {
        println!("    Break Duration:");
        println!("      Auto Return: {}", duration.auto_return);
        println!("      Duration: {}", format_ticks(duration.duration));
    }
    println!("    Unique Program ID: {}", info.unique_program_id);
    println!("    Avail Num: {}", info.avail_num);
    println!("    Avails Expected: {}", info.avails_expected);
}

fn print_schedule_event(event: &ScheduleEvent) {
    println!("    Splice Event ID: {}", event.splice_event_id);
    println!(
        "      Splice Event Cancel: {}",
        event.splice_event_cancel_indicator
    );
    let Some(info) = &event.information else {
        return;
    };
    println!("      Out of Network: {}", info.out_of_network_indicator);
    if let Some(utc) = info.utc_splice_time {
        println!("      UTC Splice Time: {utc}");
    }
    for component in info.components.iter().flatten() {
        println!(
            "      Component 0x{:02X}: UTC {}",
            component.component_tag, component.utc_splice_time
        );
    }
    if let Some(duration) = &info.break_duration {
        println!(
            "      Break Duration: {} (auto return: {})",
            format_ticks(duration.duration),
            duration.auto_return
        );
    }
    println!("      Unique Program ID: {}", info.unique_program_id);
    println!("      Avail Num: {}", info.avail_num);
    println!("      Avails Expected: {}", info.avails_expected);
}

fn print_descriptor(descriptor: &SpliceDescriptor) {
    println!("    Descriptor Tag: 0x{:02X}", descriptor.tag());
    println!(
        "      Identifier: {}",
        format_identifier_to_string(descriptor.identifier())
    );
    match descriptor {
        SpliceDescriptor::Avail(avail) => {
            println!("      Avail Descriptor");
            println!("      Provider Avail ID: {}", avail.provider_avail_id);
        }
        SpliceDescriptor::Dtmf(dtmf) => {
            println!("      DTMF Descriptor");
            println!("      Preroll: {}", dtmf.preroll);
            println!("      DTMF Chars: {}", dtmf.dtmf_chars);
        }
        SpliceDescriptor::Segmentation(segmentation) => print_segmentation(segmentation),
        SpliceDescriptor::Time(time) => {
            println!("      Time Descriptor");
            println!("      TAI Seconds: {}", time.tai_seconds);
            println!("      TAI Nanoseconds: {}", time.tai_ns);
            println!("      UTC Offset: {}", time.utc_offset);
        }
        SpliceDescriptor::Audio(audio) => {
            println!("      Audio Descriptor");
            for component in &audio.components {
                println!(
                    "      Component 0x{:02X}: {} (bsmod {}, {} channels, full service: {})",
                    component.component_tag,
                    component.iso_code,
                    component.bit_stream_mode,
                    component.num_channels,
                    component.full_srvc_audio
                );
            }
        }
    }
}

fn print_segmentation(segmentation: &SegmentationDescriptor) {
    println!("      Segmentation Descriptor");
    println!(
        "      Segmentation Event ID: 0x{:08x} ({})",
        segmentation.segmentation_event_id, segmentation.segmentation_event_id
    );
    println!(
        "      Segmentation Event Cancel: {}",
        segmentation.segmentation_event_cancel_indicator
    );
    let Some(info) = &segmentation.information else {
        return;
    };
    println!(
        "      Segmentation Type: {} (0x{:02X})",
        info.segmentation_type_id.description(),
        info.segmentation_type_id.id()
    );
    println!(
        "      Program Segmentation Flag: {}",
        info.program_segmentation_flag
    );
    if let Some(restrictions) = &info.restrictions {
        println!(
            "      Web Delivery Allowed: {}",
            restrictions.web_delivery_allowed
        );
        println!(
            "      No Regional Blackout: {}",
            restrictions.no_regional_blackout
        );
        println!("      Archive Allowed: {}", restrictions.archive_allowed);
        println!(
            "      Device Restrictions: {}",
            restrictions.device_restrictions.description()
        );
    }
    for component in info.components.iter().flatten() {
        println!(
            "      Component 0x{:02X}: PTS offset {}",
            component.component_tag,
            format_ticks(component.pts_offset)
        );
    }
    if let Some(duration) = info.segmentation_duration {
        println!("      Segmentation Duration: {}", format_ticks(duration));
    }
    let upid = &info.segmentation_upid;
    println!(
        "      UPID Type: {} (0x{:02X})",
        upid.upid_type.description(),
        u8::from(upid.upid_type)
    );
    println!("      UPID Length: {}", upid.length);
    if let Some(value) = &upid.info {
        println!("      UPID: {value}");
    }
    println!("      Segment Num: {}", info.segment_num);
    println!("      Segments Expected: {}", info.segments_expected);
    if let (Some(num), Some(expected)) = (info.sub_segment_num, info.sub_segments_expected) {
        println!("      Sub Segment Num: {num}");
        println!("      Sub Segments Expected: {expected}");
    }
}
