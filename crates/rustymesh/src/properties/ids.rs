//! Device property ID registry
//!
//! Maps the 16-bit device property IDs to a human-readable name and the
//! binary shape their characteristic encodes as. Properties whose
//! characteristic is a composite structure not covered by the shared
//! shapes dispatch to the opaque [`CharacteristicFormat::Raw`] codec, as
//! do IDs missing from the table.

use super::characteristic::{Characteristic, CharacteristicFormat};
use super::PropertyResult;
use std::fmt;

use CharacteristicFormat::*;

/// A 16-bit device property ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceProperty(pub u16);

impl DeviceProperty {
    /// Human-readable property name, if the ID is registered.
    pub fn name(&self) -> &'static str {
        lookup(self.0).map_or("Unknown Device Property", |entry| entry.1)
    }

    /// The binary shape the property's characteristic encodes as.
    pub fn format(&self) -> CharacteristicFormat {
        lookup(self.0).map_or(Raw, |entry| entry.2)
    }

    /// Decode `length` bytes at `offset` using the property's codec.
    pub fn decode_value(
        &self,
        data: &[u8],
        offset: usize,
        length: usize,
    ) -> PropertyResult<Characteristic> {
        Characteristic::decode(self.format(), data, offset, length)
    }
}

impl fmt::Display for DeviceProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.name(), self.0)
    }
}

fn lookup(id: u16) -> Option<&'static (u16, &'static str, CharacteristicFormat)> {
    // Table is sorted by ID
    PROPERTY_TABLE
        .binary_search_by_key(&id, |entry| entry.0)
        .ok()
        .map(|index| &PROPERTY_TABLE[index])
}

/// Device property registry, sorted by property ID
static PROPERTY_TABLE: &[(u16, &str, CharacteristicFormat)] = &[
    (0x0001, "Average Ambient Temperature In A Period Of Day", Raw),
    (0x0002, "Average Input Current", Raw),
    (0x0003, "Average Input Voltage", Raw),
    (0x0004, "Average Output Current", Raw),
    (0x0005, "Average Output Voltage", Raw),
    (0x0006, "Center Beam Intensity At Full Power", Count16),
    (0x0007, "Chromaticity Tolerance", Raw),
    (0x0008, "Color Rendering Index R9", Raw),
    (0x0009, "Color Rendering Index Ra", Raw),
    (0x000A, "Device Appearance", Count16),
    (0x000B, "Device Country Of Origin", Count16),
    (0x000C, "Device Date Of Manufacture", Raw),
    (0x000D, "Device Energy Use Since Turn On", Energy),
    (0x000E, "Device Firmware Revision", FixedString8),
    (0x000F, "Device Global Trade Item Number", Raw),
    (0x0010, "Device Hardware Revision", FixedString16),
    (0x0011, "Device Manufacturer Name", FixedString36),
    (0x0012, "Device Model Number", FixedString24),
    (0x0013, "Device Operating Temperature Range Specification", Raw),
    (0x0014, "Device Operating Temperature Statistical Values", Raw),
    (0x0015, "Device Over Temperature Event Statistics", Raw),
    (0x0016, "Device Power Range Specification", Raw),
    (0x0017, "Device Runtime Since Turn On", TimeHour24),
    (0x0018, "Device Runtime Warranty", TimeHour24),
    (0x0019, "Device Serial Number", FixedString16),
    (0x001A, "Device Software Revision", FixedString8),
    (0x001B, "Device Under Temperature Event Statistics", Raw),
    (0x001C, "Indoor Ambient Temperature Statistical Values", Raw),
    (0x001D, "Initial CIE 1931 Chromaticity Coordinates", Raw),
    (0x001E, "Initial Correlated Color Temperature", Count16),
    (0x001F, "Initial Luminous Flux", Count16),
    (0x0020, "Initial Planckian Distance", Raw),
    (0x0021, "Input Current Range Specification", Raw),
    (0x0022, "Input Current Statistics", Raw),
    (0x0023, "Input Over Current Event Statistics", Raw),
    (0x0024, "Input Over Ripple Voltage Event Statistics", Raw),
    (0x0025, "Input Over Voltage Event Statistics", Raw),
    (0x0026, "Input Under Current Event Statistics", Raw),
    (0x0027, "Input Under Voltage Event Statistics", Raw),
    (0x0028, "Input Voltage Range Specification", Raw),
    (0x0029, "Input Voltage Ripple Specification", Percentage8),
    (0x002A, "Input Voltage Statistics", Raw),
    (0x002B, "Light Control Ambient LuxLevel On", Illuminance),
    (0x002C, "Light Control Ambient LuxLevel Prolong", Illuminance),
    (0x002D, "Light Control Ambient LuxLevel Standby", Illuminance),
    (0x002E, "Light Control Lightness On", PerceivedLightness),
    (0x002F, "Light Control Lightness Prolong", PerceivedLightness),
    (0x0030, "Light Control Lightness Standby", PerceivedLightness),
    (0x0031, "Light Control Regulator Accuracy", Percentage8),
    (0x0032, "Light Control Regulator Kid", Raw),
    (0x0033, "Light Control Regulator Kiu", Raw),
    (0x0034, "Light Control Regulator Kpd", Raw),
    (0x0035, "Light Control Regulator Kpu", Raw),
    (0x0036, "Light Control Time Fade", TimeMillisecond24),
    (0x0037, "Light Control Time Fade On", TimeMillisecond24),
    (0x0038, "Light Control Time Fade Standby Auto", TimeMillisecond24),
    (0x0039, "Light Control Time Fade Standby Manual", TimeMillisecond24),
    (0x003A, "Light Control Time Occupancy Delay", TimeMillisecond24),
    (0x003B, "Light Control Time Prolong", TimeMillisecond24),
    (0x003C, "Light Control Time Run On", TimeMillisecond24),
    (0x003D, "Lumen Maintenance Observation", Raw),
    (0x003E, "Luminous Efficacy", Raw),
    (0x003F, "Luminous Energy Since Turn On", Raw),
    (0x0040, "Luminous Exposure", Raw),
    (0x0041, "Luminous Flux Range", Raw),
    (0x0042, "Motion Sensed", Percentage8),
    (0x0043, "Motion Threshold", Percentage8),
    (0x0044, "Open Circuit Event Statistics", Raw),
    (0x0045, "Outdoor Statistical Values", Raw),
    (0x0046, "Output Current Range", Raw),
    (0x0047, "Output Current Statistics", Raw),
    (0x0048, "Output Ripple Voltage Specification", Percentage8),
    (0x0049, "Output Voltage Range", Raw),
    (0x004A, "Output Voltage Statistics", Raw),
    (0x004B, "Over Output Ripple Voltage Event Statistics", Raw),
    (0x004C, "People Count", Count16),
    (0x004D, "Presence Detected", Boolean),
    (0x004E, "Present Ambient Light Level", Illuminance),
    (0x004F, "Present Ambient Temperature", Temperature8),
    (0x0050, "Present CIE 1931 Chromaticity Coordinates", Raw),
    (0x0051, "Present Correlated Color Temperature", Count16),
    (0x0052, "Present Device Input Power", Power),
    (0x0053, "Present Device Operating Efficiency", Percentage8),
    (0x0054, "Present Device Operating Temperature", Temperature),
    (0x0055, "Present Illuminance", Illuminance),
    (0x0056, "Present Indoor Ambient Temperature", Temperature8),
    (0x0057, "Present Input Current", ElectricCurrent),
    (0x0058, "Present Input Ripple Voltage", Percentage8),
    (0x0059, "Present Input Voltage", Voltage),
    (0x005A, "Present Luminous Flux", Count16),
    (0x005B, "Present Outdoor Ambient Temperature", Temperature8),
    (0x005C, "Present Output Current", ElectricCurrent),
    (0x005D, "Present Output Voltage", Voltage),
    (0x005E, "Present Planckian Distance", Raw),
    (0x005F, "Present Relative Output Ripple Voltage", Percentage8),
    (0x0060, "Relative Device Energy Use In A Period Of Day", Raw),
    (0x0061, "Relative Device Runtime In A Generic Level Range", Raw),
    (0x0062, "Relative Exposure Time In An Illuminance Range", Raw),
    (0x0063, "Relative Runtime In A Correlated Color Temperature Range", Raw),
    (0x0064, "Relative Runtime In A Device Operating Temperature Range", Raw),
    (0x0065, "Relative Runtime In An Input Current Range", Raw),
    (0x0066, "Relative Runtime In An Input Voltage Range", Raw),
    (0x0067, "Short Circuit Event Statistics", Raw),
    (0x0068, "Time Since Motion Sensed", TimeSecond16),
    (0x0069, "Time Since Presence Detected", TimeSecond16),
    (0x006A, "Total Device Energy Use", Energy),
    (0x006B, "Total Device Off On Cycles", Count24),
    (0x006C, "Total Device Power On Cycles", Count24),
    (0x006D, "Total Device Power On Time", TimeHour24),
    (0x006E, "Total Device Runtime", TimeHour24),
    (0x006F, "Total Light Exposure Time", TimeHour24),
    (0x0070, "Total Luminous Energy", Raw),
    (0x0071, "Desired Ambient Temperature", Temperature8),
    (0x0072, "Precise Total Device Energy Use", Raw),
    (0x0073, "Power Factor", Raw),
    (0x0074, "Sensor Gain", Raw),
    (0x0075, "Precise Present Ambient Temperature", Temperature),
    (0x0076, "Present Ambient Relative Humidity", Humidity),
    (0x0077, "Present Ambient Carbon Dioxide Concentration", Co2Concentration),
    (0x0078, "Present Ambient Volatile Organic Compounds Concentration", Count16),
    (0x0079, "Present Ambient Noise", Raw),
    (0x007D, "Device Operating Temperature Specification", Raw),
    (0x0080, "Active Energy Loadside", Raw),
    (0x0081, "Active Power Loadside", Power),
    (0x0082, "Air Pressure", Pressure),
    (0x0083, "Apparent Energy", Raw),
    (0x0084, "Apparent Power", Raw),
    (0x0085, "Apparent Wind Direction", Raw),
    (0x0086, "Apparent Wind Speed", Raw),
    (0x0087, "Dew Point", Raw),
    (0x0088, "External Supply Voltage", Raw),
    (0x0089, "External Supply Voltage Frequency", Raw),
    (0x008A, "Gust Factor", Raw),
    (0x008B, "Heat Index", Raw),
    (0x008C, "Light Distribution", Raw),
    (0x008D, "Light Source Current", Raw),
    (0x008E, "Light Source On Time Not Resettable", Raw),
    (0x008F, "Light Source On Time Resettable", Raw),
    (0x0090, "Light Source Open Circuit Statistics", Raw),
    (0x0091, "Light Source Overall Failures Statistics", Raw),
    (0x0092, "Light Source Short Circuit Statistics", Raw),
    (0x0093, "Light Source Start Counter Resettable", Raw),
    (0x0094, "Light Source Temperature", Raw),
    (0x0095, "Luminaire Color", FixedString24),
    (0x0096, "Luminaire Identification Number", FixedString24),
    (0x0097, "Luminaire Manufacturer GTIN", Raw),
    (0x0098, "Luminaire Nominal Input Power", Power),
    (0x0099, "Luminaire Nominal Maximum AC Mains Voltage", Voltage),
    (0x009A, "Luminaire Nominal Minimum AC Mains Voltage", Voltage),
    (0x009B, "Luminaire Power At Minimum Dim Level", Power),
    (0x009C, "Luminaire Time Of Manufacture", Raw),
    (0x009D, "Motion Sensed Level", Percentage8),
    (0x00A0, "Nominal Light Output", Raw),
    (0x00A1, "Overall Failure Condition", Raw),
    (0x00A2, "Pollen Concentration", Raw),
    (0x00A3, "Present Indoor Relative Humidity", Humidity),
    (0x00A4, "Present Outdoor Relative Humidity", Humidity),
    (0x00A5, "Pressure", Pressure),
    (0x00A6, "Rainfall", Raw),
    (0x00A7, "Rated Median Useful Life Of Luminaire", TimeHour24),
    (0x00A8, "Rated Median Useful Light Source Starts", Count24),
    (0x00A9, "Reference Temperature", Temperature),
    (0x00AA, "Total Device Starts", Count24),
    (0x00AB, "True Wind Direction", Raw),
    (0x00AC, "True Wind Speed", Raw),
    (0x00AD, "UV Index", Raw),
    (0x00AE, "Wind Chill", Raw),
];
