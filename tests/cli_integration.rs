//! Integration tests for the command-line decoder

#[cfg(feature = "cli")]
#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;

    // splice_insert with an avail descriptor
    const INSERT_PAYLOAD: &str =
        "/DAvAAAAAAAA///wFAVIAACPf+/+c2nALv4AUsz1AAAAAAAKAAhDVUVJAAABNWLbowo=";
    const INSERT_HEX: &str = "0xFC302F000000000000FFFFF014054800008F7FEFFE7369C02EFE0052CCF500000000000A0008435545490000013562DBA30A";

    fn decoder() -> Command {
        Command::cargo_bin("scte35-decoder").unwrap()
    }

    fn json_output(args: &[&str]) -> (bool, serde_json::Value) {
        let output = decoder()
            .args(args)
            .output()
            .expect("Failed to execute CLI command");
        let stdout = String::from_utf8(output.stdout).expect("Output should be valid UTF-8");
        let json = serde_json::from_str(&stdout).expect("Output should be valid JSON");
        (output.status.success(), json)
    }

    #[test]
    fn test_cli_text_output_works() {
        let output = decoder()
            .arg(INSERT_PAYLOAD)
            .output()
            .expect("Failed to execute CLI command");

        assert!(output.status.success(), "CLI command should succeed");

        let stdout = String::from_utf8(output.stdout).expect("Output should be valid UTF-8");
        assert!(stdout.contains("Successfully parsed SpliceInfoSection"));
        assert!(stdout.contains("Table ID: 252"));
        assert!(stdout.contains("Tier: 0xFFF"));
        assert!(stdout.contains("Splice Command: SpliceInsert"));
        assert!(stdout.contains("Splice Event ID: 0x4800008f (1207959695)"));
        assert!(stdout.contains("Avail Descriptor"));
        assert!(stdout.contains("Identifier: CUEI"));
        assert!(stdout.contains("Provider Avail ID: 309"));
        assert!(stdout.contains("CRC-32: 0x62DBA30A"));
        assert!(!stdout.contains("CRC-32 Valid"));
    }

    #[test]
    fn test_cli_json_output_works() {
        let (success, json) = json_output(&["-o", "json", INSERT_PAYLOAD]);
        assert!(success);
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["table_id"], 252);
        assert_eq!(json["data"]["splice_command"]["type"], "Insert");
        assert_eq!(
            json["data"]["splice_command"]["splice_event_id"],
            0x4800_008F
        );
        assert_eq!(json["data"]["splice_descriptors"][0]["type"], "Avail");
        assert!(json.get("crc_valid").is_none());
    }

    #[test]
    fn test_cli_json_output_long_flag_with_crc() {
        let (success, json) = json_output(&["--output", "json", "--verify-crc", INSERT_PAYLOAD]);
        assert!(success);
        assert_eq!(json["crc_valid"], true);
    }

    #[test]
    fn test_cli_text_output_with_crc() {
        decoder()
            .args(["--verify-crc", INSERT_PAYLOAD])
            .assert()
            .success()
            .stdout(predicate::str::contains("CRC-32 Valid: true"));
    }

    #[test]
    fn test_cli_reports_crc_mismatch() {
        // last CRC byte altered
        let tampered = INSERT_HEX.replace("62DBA30A", "62DBA30B");
        let (success, json) = json_output(&["-o", "json", "--verify-crc", &tampered]);
        assert!(success);
        assert_eq!(json["data"]["crc_32"], "0x62DBA30B");
        assert_eq!(json["crc_valid"], false);
    }

    #[test]
    fn test_cli_detects_hex_payload() {
        decoder()
            .arg(INSERT_HEX)
            .assert()
            .success()
            .stdout(predicate::str::contains("Splice Event ID: 0x4800008f"));
    }

    #[test]
    fn test_cli_explicit_hex_input() {
        let unprefixed = INSERT_HEX.trim_start_matches("0x").to_lowercase();
        decoder()
            .args(["-i", "hex", &unprefixed])
            .assert()
            .success()
            .stdout(predicate::str::contains("CRC-32: 0x62DBA30A"));
    }

    #[test]
    fn test_cli_help_contains_expected_text() {
        decoder()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Decode SCTE-35 splice information sections from base64 or hex payloads",
            ))
            .stdout(predicate::str::contains("Base64 or hex encoded SCTE-35 payload"))
            .stdout(predicate::str::contains("Output format"));
    }

    #[test]
    fn test_cli_version_works() {
        decoder()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("scte35-decoder"));
    }

    #[test]
    fn test_cli_handles_invalid_base64() {
        decoder()
            .arg("not-valid-base64!")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error decoding base64 string"));
    }

    #[test]
    fn test_cli_handles_invalid_base64_json() {
        let (success, json) = json_output(&["-o", "json", "not-valid-base64!"]);
        assert!(!success);
        assert_eq!(json["status"], "error");
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .contains("Error decoding base64 string")
        );
    }

    #[test]
    fn test_cli_handles_invalid_hex() {
        decoder()
            .args(["-i", "hex", "0xFCZZ"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error decoding hex string"));
    }

    #[test]
    fn test_cli_handles_short_message() {
        decoder()
            .arg("/DAWAAAA")
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Error decoding splice info section",
            ))
            .stderr(predicate::str::contains("200-bit minimum"));
    }
}
