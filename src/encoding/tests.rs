//! Round-trip tests against real SCTE-35 cues.
//!
//! Every UPID decoded from a captured message must encode back to the exact
//! bytes it was read from.

use data_encoding::BASE64;

use crate::encoding::Encodable;
use crate::parser::decode;
use crate::types::SpliceCommand;
use crate::upid::SegmentationUpid;

fn upids_of(base64_payload: &str) -> (Vec<u8>, Vec<SegmentationUpid>) {
    let buffer = BASE64
        .decode(base64_payload.as_bytes())
        .expect("Failed to decode base64 payload");
    let section = decode(&buffer).expect("Failed to decode SCTE-35 message");
    let upids = section
        .splice_descriptors
        .iter()
        .filter_map(|descriptor| descriptor.as_segmentation())
        .filter_map(|segmentation| segmentation.information.as_ref())
        .map(|info| info.segmentation_upid.clone())
        .collect();
    (buffer, upids)
}

fn assert_upids_round_trip(base64_payload: &str, description: &str) {
    let (buffer, upids) = upids_of(base64_payload);
    assert!(!upids.is_empty(), "{description}: no UPID found");

    for upid in upids {
        let encoded = upid
            .encode_to_bits()
            .unwrap_or_else(|e| panic!("{description}: failed to encode {upid:?}: {e}"));
        assert_eq!(encoded.len(), upid.encoded_bits(), "{description}");
        let bytes = encoded.as_bytes();
        assert!(
            buffer.windows(bytes.len()).any(|window| window == bytes),
            "{description}: re-encoded UPID {bytes:02X?} not found in the original message"
        );
    }
}

#[test]
fn test_ad_id_round_trip() {
    assert_upids_round_trip(
        "/DA4AAAAAAAA///wBQb+AAAAAAAiAiBDVUVJAAAAA3//AAApPWwDDEFCQ0QwMTIzNDU2SBAAAGgCL9A=",
        "Ad-ID",
    );
}

#[test]
fn test_umid_round_trip() {
    assert_upids_round_trip(
        "/DBHAAAAAAAA///wBQb+AAAAAAAxAi9DVUVJAAAAA3+/BCAGCis0AQEBBQEBDSATAAAA0skDbI8ZU0OrcBTS1xi/2hEAAPUV9+0=",
        "UMID",
    );
}

#[test]
fn test_visan_round_trip() {
    assert_upids_round_trip(
        "/DA4AAAAAAAA///wBQb+AAAAAAAiAiBDVUVJAAAAA3//AAApPWwGDBU8c2Wzb4RMhzSUIBAAAHVCIBw=",
        "V-ISAN",
    );
}

#[test]
fn test_tid_round_trip() {
    assert_upids_round_trip(
        "/DA4AAAAAAAA///wBQb+AAAAAAAiAiBDVUVJAAAAA3//AAApPWwHDE1WMDAwNDE0NjQwMBAAAIH4Mwc=",
        "TID",
    );
}

#[test]
fn test_eidr_round_trip() {
    assert_upids_round_trip(
        "/DA4AAAAAAAA///wBQb+AAAAAAAiAiBDVUVJAAAAA3//AAApPWwKDBR4+FrhALBoW4+xyBAAAGij1lQ=",
        "EIDR",
    );
}

#[test]
fn test_mid_round_trip() {
    assert_upids_round_trip(
        "/DA9AAAAAAAAAACABQb+0fha8wAnAiVDVUVJSAAAv3/PAAD4+mMNEQ4FTEEzMDkICAAAAAAuU4SBNAAAPIaCPw==",
        "MID",
    );
}

#[test]
fn test_mpu_round_trip() {
    assert_upids_round_trip(
        "/DCVAAAAAsrbAP/wBQb/mbLvEAB/AntDVUVJAAAAAn/TAACkydoMZ05CQ1V7J2Fzc2V0SWQnOidwZWFjb2NrXzE1Mzk0MycsJ2N1ZURhdGEnOnsnY3VlVHlwZSc6J2FmZmlsaWF0ZV9icmVhaycsJ2tleSc6J3BiJywndmFsdWUnOidhZmZpbGlhdGUnfX00AAAAAJYJLnk=",
        "MPU",
    );
}

#[test]
fn test_insert_splice_time_round_trip() {
    let buffer = BASE64
        .decode(b"/DAvAAAAAAAAAP///wViAAWKf+//CXVCAv4AUmXAAzUAAAAKAAhDVUVJADgyMWLvc/g=")
        .expect("Failed to decode base64 payload");
    let section = decode(&buffer).expect("Failed to decode SCTE-35 message");

    let SpliceCommand::Insert(insert) = section.splice_command else {
        panic!("expected a splice_insert command");
    };
    let info = insert.information.expect("insert should carry event information");

    let time = info.splice_time.expect("program splice should carry a time");
    let duration = info.break_duration.expect("insert should carry a break duration");
    let time_bits = time.encode_to_bits().unwrap();
    let duration_bits = duration.encode_to_bits().unwrap();

    // the command starts at byte 14; id, cancel and flag bytes come first
    assert_eq!(time_bits.as_bytes(), &buffer[20..25]);
    assert_eq!(duration_bits.as_bytes(), &buffer[25..30]);
}
