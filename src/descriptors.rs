//! Splice descriptor types.
//!
//! Descriptors extend a splice command with additional metadata. They are
//! carried in the descriptor loop that follows the command and are identified
//! by an 8-bit tag.

use std::time::Duration;

use crate::time::ticks_to_duration;
use crate::upid::SegmentationUpid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The `CUEI` identifier (0x43554549) carried by SCTE-35 descriptors.
pub const CUEI_IDENTIFIER: u32 = 0x4355_4549;

/// A decoded splice descriptor.
///
/// Reserved tags never reach this type: the descriptor loop skips them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum SpliceDescriptor {
    /// `avail_descriptor()` (tag 0x00)
    Avail(AvailDescriptor),
    /// `DTMF_descriptor()` (tag 0x01)
    Dtmf(DtmfDescriptor),
    /// `segmentation_descriptor()` (tag 0x02)
    Segmentation(SegmentationDescriptor),
    /// `time_descriptor()` (tag 0x03)
    Time(TimeDescriptor),
    /// `audio_descriptor()` (tag 0x04)
    Audio(AudioDescriptor),
}

impl SpliceDescriptor {
    /// The splice descriptor tag this variant was decoded from.
    pub fn tag(&self) -> u8 {
        match self {
            SpliceDescriptor::Avail(_) => 0x00,
            SpliceDescriptor::Dtmf(_) => 0x01,
            SpliceDescriptor::Segmentation(_) => 0x02,
            SpliceDescriptor::Time(_) => 0x03,
            SpliceDescriptor::Audio(_) => 0x04,
        }
    }

    /// The 32-bit identifier field of the descriptor.
    pub fn identifier(&self) -> u32 {
        match self {
            SpliceDescriptor::Avail(d) => d.identifier,
            SpliceDescriptor::Dtmf(d) => d.identifier,
            SpliceDescriptor::Segmentation(d) => d.identifier,
            SpliceDescriptor::Time(d) => d.identifier,
            SpliceDescriptor::Audio(d) => d.identifier,
        }
    }

    /// Returns the segmentation descriptor, if this is one.
    pub fn as_segmentation(&self) -> Option<&SegmentationDescriptor> {
        match self {
            SpliceDescriptor::Segmentation(d) => Some(d),
            _ => None,
        }
    }
}

/// An `avail_descriptor()`, identifying the avail slot a cue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AvailDescriptor {
    /// Always `CUEI`
    pub identifier: u32,
    /// Provider-assigned avail identifier
    pub provider_avail_id: u32,
}

/// A `DTMF_descriptor()` carrying the tone sequence for legacy equipment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DtmfDescriptor {
    /// Always `CUEI`
    pub identifier: u32,
    /// Time before the splice to emit the tones, in tenths of a second
    pub preroll: u8,
    /// DTMF characters, at most seven
    pub dtmf_chars: String,
}

/// A `time_descriptor()` carrying TAI wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeDescriptor {
    pub identifier: u32,
    /// 48-bit TAI seconds
    pub tai_seconds: u64,
    pub tai_ns: u32,
    /// Offset from TAI to UTC, in seconds
    pub utc_offset: u16,
}

/// An `audio_descriptor()` describing the audio services of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AudioDescriptor {
    pub identifier: u32,
    pub components: Vec<AudioComponent>,
}

/// One 40-bit audio component entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AudioComponent {
    pub component_tag: u8,
    /// ISO 639-2 language code, three characters
    pub iso_code: String,
    pub bit_stream_mode: u8,
    pub num_channels: u8,
    pub full_srvc_audio: bool,
}

/// A `segmentation_descriptor()`.
///
/// Marks the boundaries of programs, chapters, ad breaks and other segments,
/// optionally naming the content through a [`SegmentationUpid`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentationDescriptor {
    /// Always `CUEI`
    pub identifier: u32,
    /// Unique identifier for the segmentation event
    pub segmentation_event_id: u32,
    /// Set when a previously sent event with this id is cancelled
    pub segmentation_event_cancel_indicator: bool,
    /// Segment details, absent when the event is cancelled
    pub information: Option<SegmentationAdditionalInfo>,
}

impl SegmentationDescriptor {
    /// The segmentation type, if the event is not cancelled.
    pub fn segmentation_type(&self) -> Option<SegmentationTypeId> {
        self.information.as_ref().map(|i| i.segmentation_type_id)
    }
}

/// The body of a non-cancelled segmentation descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentationAdditionalInfo {
    /// Set when the segment applies to the whole program
    pub program_segmentation_flag: bool,
    /// Set when a segmentation duration is present
    pub segmentation_duration_flag: bool,
    /// Set when delivery is unrestricted; clear when `restrictions` follow
    pub delivery_not_restricted_flag: bool,
    /// Delivery restrictions, present when delivery is restricted
    pub restrictions: Option<Restrictions>,
    /// Per-component PTS offsets, present for a component segmentation
    pub components: Option<Vec<PidComponent>>,
    /// Segment length in 90 kHz ticks (40 bits)
    pub segmentation_duration: Option<u64>,
    /// The content identifier
    pub segmentation_upid: SegmentationUpid,
    /// What kind of segment boundary this is
    pub segmentation_type_id: SegmentationTypeId,
    /// Index of this segment
    pub segment_num: u8,
    /// Number of segments expected
    pub segments_expected: u8,
    /// Sub-segment index, only for placement opportunity starts
    pub sub_segment_num: Option<u8>,
    /// Sub-segments expected, only for placement opportunity starts
    pub sub_segments_expected: Option<u8>,
}

impl SegmentationAdditionalInfo {
    /// Converts the segmentation duration to a [`Duration`].
    pub fn duration(&self) -> Option<Duration> {
        self.segmentation_duration.map(ticks_to_duration)
    }
}

/// Delivery restrictions signalled when `delivery_not_restricted_flag` is clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Restrictions {
    pub web_delivery_allowed: bool,
    pub no_regional_blackout: bool,
    pub archive_allowed: bool,
    pub device_restrictions: DeviceRestrictions,
}

/// The 2-bit device restriction group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeviceRestrictions {
    /// Restrict group 0 (0b00)
    RestrictGroup0,
    /// Restrict group 1 (0b01)
    RestrictGroup1,
    /// Restrict group 2 (0b10)
    RestrictGroup2,
    /// No restrictions (0b11)
    NoRestrictions,
}

impl DeviceRestrictions {
    /// Maps the low two bits of `value`.
    pub fn from_bits(value: u8) -> Self {
        match value & 0b11 {
            0b00 => DeviceRestrictions::RestrictGroup0,
            0b01 => DeviceRestrictions::RestrictGroup1,
            0b10 => DeviceRestrictions::RestrictGroup2,
            _ => DeviceRestrictions::NoRestrictions,
        }
    }

    /// The 2-bit wire value.
    pub fn bits(&self) -> u8 {
        match self {
            DeviceRestrictions::RestrictGroup0 => 0b00,
            DeviceRestrictions::RestrictGroup1 => 0b01,
            DeviceRestrictions::RestrictGroup2 => 0b10,
            DeviceRestrictions::NoRestrictions => 0b11,
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            DeviceRestrictions::RestrictGroup0 => {
                "Restrict Group 0: restricted to devices in group 0"
            }
            DeviceRestrictions::RestrictGroup1 => {
                "Restrict Group 1: restricted to devices in group 1"
            }
            DeviceRestrictions::RestrictGroup2 => {
                "Restrict Group 2: restricted to devices in group 2"
            }
            DeviceRestrictions::NoRestrictions => "No restrictions",
        }
    }
}

/// One 48-bit component entry of a component segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PidComponent {
    pub component_tag: u8,
    /// 33-bit PTS offset in 90 kHz ticks
    pub pts_offset: u64,
}

macro_rules! segmentation_types {
    ($($(#[$meta:meta])* $variant:ident = $id:literal => $description:literal,)+) => {
        /// The `segmentation_type_id` of a segmentation descriptor.
        ///
        /// Only the codes listed in the standard's table are accepted; any other
        /// value fails the descriptor.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[non_exhaustive]
        pub enum SegmentationTypeId {
            $($(#[$meta])* $variant,)+
        }

        impl SegmentationTypeId {
            /// Returns the numeric identifier for this segmentation type.
            ///
            /// # Example
            ///
            /// ```rust
            /// use scte35_decoder::SegmentationTypeId;
            ///
            /// assert_eq!(SegmentationTypeId::ProviderAdvertisementStart.id(), 0x30);
            /// assert_eq!(SegmentationTypeId::ProgramStart.id(), 0x10);
            /// ```
            pub fn id(&self) -> u8 {
                match self {
                    $(SegmentationTypeId::$variant => $id,)+
                }
            }

            /// Looks up a segmentation type by its numeric identifier.
            ///
            /// # Example
            ///
            /// ```rust
            /// use scte35_decoder::SegmentationTypeId;
            ///
            /// assert_eq!(
            ///     SegmentationTypeId::from_id(0x34),
            ///     Some(SegmentationTypeId::ProviderPlacementOpportunityStart)
            /// );
            /// assert_eq!(SegmentationTypeId::from_id(0xFF), None);
            /// ```
            pub fn from_id(id: u8) -> Option<Self> {
                match id {
                    $($id => Some(SegmentationTypeId::$variant),)+
                    _ => None,
                }
            }

            /// Returns a human-readable description of the segmentation type.
            pub fn description(&self) -> &'static str {
                match self {
                    $(SegmentationTypeId::$variant => $description,)+
                }
            }
        }
    };
}

segmentation_types! {
    NotIndicated = 0x00 => "Not Indicated",
    ContentIdentification = 0x01 => "Content Identification",
    ProgramStart = 0x10 => "Program Start",
    ProgramEnd = 0x11 => "Program End",
    ProgramEarlyTermination = 0x12 => "Program Early Termination",
    ProgramBreakaway = 0x13 => "Program Breakaway",
    ProgramResumption = 0x14 => "Program Resumption",
    ProgramRunoverPlanned = 0x15 => "Program Runover Planned",
    ProgramRunoverUnplanned = 0x16 => "Program Runover Unplanned",
    ProgramOverlapStart = 0x17 => "Program Overlap Start",
    ProgramBlackoutOverride = 0x18 => "Program Blackout Override",
    /// Joining a program already in progress
    ProgramStartInProgress = 0x19 => "Program Start - In Progress",
    ChapterStart = 0x20 => "Chapter Start",
    ChapterEnd = 0x21 => "Chapter End",
    BreakStart = 0x22 => "Break Start",
    BreakEnd = 0x23 => "Break End",
    OpeningCreditStart = 0x24 => "Opening Credit Start",
    OpeningCreditEnd = 0x25 => "Opening Credit End",
    ClosingCreditStart = 0x26 => "Closing Credit Start",
    ClosingCreditEnd = 0x27 => "Closing Credit End",
    ProviderAdvertisementStart = 0x30 => "Provider Advertisement Start",
    ProviderAdvertisementEnd = 0x31 => "Provider Advertisement End",
    DistributorAdvertisementStart = 0x32 => "Distributor Advertisement Start",
    DistributorAdvertisementEnd = 0x33 => "Distributor Advertisement End",
    ProviderPlacementOpportunityStart = 0x34 => "Provider Placement Opportunity Start",
    ProviderPlacementOpportunityEnd = 0x35 => "Provider Placement Opportunity End",
    DistributorPlacementOpportunityStart = 0x36 => "Distributor Placement Opportunity Start",
    DistributorPlacementOpportunityEnd = 0x37 => "Distributor Placement Opportunity End",
    ProviderOverlayPlacementOpportunityStart = 0x38 => "Provider Overlay Placement Opportunity Start",
    ProviderOverlayPlacementOpportunityEnd = 0x39 => "Provider Overlay Placement Opportunity End",
    DistributorOverlayPlacementOpportunityStart = 0x3A => "Distributor Overlay Placement Opportunity Start",
    DistributorOverlayPlacementOpportunityEnd = 0x3B => "Distributor Overlay Placement Opportunity End",
    ProviderPromoStart = 0x3C => "Provider Promo Start",
    ProviderPromoEnd = 0x3D => "Provider Promo End",
    DistributorPromoStart = 0x3E => "Distributor Promo Start",
    DistributorPromoEnd = 0x3F => "Distributor Promo End",
    UnscheduledEventStart = 0x40 => "Unscheduled Event Start",
    UnscheduledEventEnd = 0x41 => "Unscheduled Event End",
    AlternateContentOpportunityStart = 0x42 => "Alternate Content Opportunity Start",
    AlternateContentOpportunityEnd = 0x43 => "Alternate Content Opportunity End",
    ProviderAdBlockStart = 0x44 => "Provider Ad Block Start",
    ProviderAdBlockEnd = 0x45 => "Provider Ad Block End",
    DistributorAdBlockStart = 0x46 => "Distributor Ad Block Start",
    DistributorAdBlockEnd = 0x47 => "Distributor Ad Block End",
    NetworkStart = 0x50 => "Network Start",
    NetworkEnd = 0x51 => "Network End",
}

impl SegmentationTypeId {
    /// True for the two placement-opportunity starts that may carry
    /// sub-segment fields.
    pub fn has_sub_segments(&self) -> bool {
        matches!(
            self,
            SegmentationTypeId::ProviderPlacementOpportunityStart
                | SegmentationTypeId::DistributorPlacementOpportunityStart
        )
    }
}
