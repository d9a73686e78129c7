use super::subsets::*;
use super::values::*;
use super::{FeatureEntry, FeatureFlags, Formatter};

const RW: FeatureFlags = FeatureFlags::RW;
const RO: FeatureFlags = FeatureFlags::RO;
const WO: FeatureFlags = FeatureFlags::WO;

const RW_C: FeatureFlags = RW.union(FeatureFlags::CONTINUOUS);
const RO_C: FeatureFlags = RO.union(FeatureFlags::CONTINUOUS);
const RW_SNC: FeatureFlags = RW.union(FeatureFlags::SIMPLE_NC);
const RO_SNC: FeatureFlags = RO.union(FeatureFlags::SIMPLE_NC);
const WO_SNC: FeatureFlags = WO.union(FeatureFlags::SIMPLE_NC);
const RW_CNC: FeatureFlags = RW.union(FeatureFlags::COMPLEX_NC);
const RO_CNC: FeatureFlags = RO.union(FeatureFlags::COMPLEX_NC);
const RW_T: FeatureFlags = RW.union(FeatureFlags::TABLE);
const RO_T: FeatureFlags = RO.union(FeatureFlags::TABLE);
const WO_T: FeatureFlags = WO.union(FeatureFlags::TABLE);
const DEPRECATED: FeatureFlags = FeatureFlags::DEPRECATED;

const D: FeatureEntry = FeatureEntry::DEFAULT;

pub(super) static FEATURES: &[FeatureEntry] = &[
    FeatureEntry {
        code: 0x01,
        subsets: CRT,
        v20_name: "Degauss",
        desc: "Causes a CRT to perform a degauss cycle",
        v20_flags: WO_SNC,
        v22_flags: WO_SNC.union(DEPRECATED),
        ..D
    },
    FeatureEntry {
        code: 0x02,
        v20_name: "New control value",
        desc: "Indicates that a display user control (other than power) has been used to change and save (or autosave) a new value",
        v20_flags: RW_CNC,
        values: Some(NEW_CONTROL_VALUE),
        formatter: Formatter::NewControlValue,
        ..D
    },
    FeatureEntry {
        code: 0x03,
        v20_name: "Soft controls",
        desc: "Allows applications to be activated by display buttons",
        v20_flags: RW_SNC,
        values: Some(SOFT_CONTROLS),
        ..D
    },
    FeatureEntry {
        code: 0x04,
        subsets: PRESET,
        v20_name: "Restore factory defaults",
        desc: "Restore all factory presets including brightness/contrast, geometry, color, and TV defaults",
        v20_flags: WO_SNC,
        ..D
    },
    FeatureEntry {
        code: 0x05,
        subsets: PRESET,
        v20_name: "Restore factory brightness/contrast defaults",
        desc: "Restore factory defaults for brightness and contrast",
        v20_flags: WO_SNC,
        ..D
    },
    FeatureEntry {
        code: 0x06,
        subsets: PRESET | CRT,
        v20_name: "Restore factory geometry defaults",
        desc: "Restore factory defaults for geometry adjustments",
        v20_flags: WO_SNC,
        ..D
    },
    FeatureEntry {
        code: 0x08,
        subsets: PRESET | COLOR,
        v20_name: "Restore color defaults",
        desc: "Restore factory defaults for color settings",
        v20_flags: WO_SNC,
        ..D
    },
    FeatureEntry {
        code: 0x0a,
        subsets: PRESET | TV,
        v20_name: "Restore factory TV defaults",
        desc: "Restore factory defaults for TV functions",
        v20_flags: WO_SNC,
        ..D
    },
    FeatureEntry {
        code: 0x0b,
        subsets: COLOR,
        v20_name: "Color temperature increment",
        desc: "Color temperature increment used by feature 0Ch Select Color Temperature",
        v20_flags: RO_CNC,
        formatter: Formatter::ColorTemperatureIncrement,
        ..D
    },
    FeatureEntry {
        code: 0x0c,
        subsets: PROFILE | COLOR,
        v20_name: "Color temperature request",
        desc: "Specifies a color temperature (degrees Kelvin)",
        v20_flags: RW_CNC,
        formatter: Formatter::ColorTemperatureRequest,
        ..D
    },
    FeatureEntry {
        code: 0x0e,
        subsets: CRT,
        v20_name: "Clock",
        desc: "Increase/decrease the sampling clock frequency",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x10,
        subsets: PROFILE | COLOR,
        v20_name: "Brightness",
        desc: "Increase/decrease the brightness of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x11,
        subsets: COLOR,
        v20_name: "Flesh tone enhancement",
        desc: "Select contrast enhancement algorithm respecting flesh tone region",
        v22_flags: RW_SNC,
        values: Some(FLESH_TONE_ENHANCEMENT),
        ..D
    },
    FeatureEntry {
        code: 0x12,
        subsets: PROFILE | COLOR,
        v20_name: "Contrast",
        desc: "Increase/decrease the contrast of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x13,
        subsets: COLOR,
        v20_name: "Backlight control",
        desc: "Increase/decrease the specified backlight control value",
        v20_flags: RW_C,
        v22_flags: RW_C.union(DEPRECATED),
        ..D
    },
    FeatureEntry {
        code: 0x14,
        subsets: PROFILE | COLOR,
        v20_name: "Select color preset",
        desc: "Select a specified color temperature",
        v20_flags: RW_SNC,
        v30_flags: RW_CNC,
        v22_flags: RW_CNC,
        values: Some(COLOR_PRESET),
        formatter: Formatter::ColorPreset,
        ..D
    },
    FeatureEntry {
        code: 0x16,
        subsets: PROFILE | COLOR,
        v20_name: "Video gain: Red",
        desc: "Increase/decrease the luminesence of red pixels",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x17,
        subsets: COLOR,
        v20_name: "User color vision compensation",
        desc: "Increase/decrease the degree of compensation",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x18,
        subsets: PROFILE | COLOR,
        v20_name: "Video gain: Green",
        desc: "Increase/decrease the luminesence of green pixels",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x1a,
        subsets: PROFILE | COLOR,
        v20_name: "Video gain: Blue",
        desc: "Increase/decrease the luminesence of blue pixels",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x1c,
        subsets: CRT,
        v20_name: "Focus",
        desc: "Increase/decrease the focus of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x1e,
        v20_name: "Auto setup",
        desc: "Perform autosetup function (H/V position, clock, clock phase, A/D converter, etc.)",
        v20_flags: RW_SNC,
        values: Some(AUTO_SETUP),
        ..D
    },
    FeatureEntry {
        code: 0x1f,
        subsets: COLOR,
        v20_name: "Auto color setup",
        desc: "Perform color autosetup function (R/G/B gain and offset, A/D setup, etc.)",
        v20_flags: RW_SNC,
        values: Some(AUTO_SETUP),
        ..D
    },
    FeatureEntry {
        code: 0x20,
        subsets: CRT,
        v20_name: "Horizontal Position (Phase)",
        desc: "Increasing (decreasing) this value moves the image toward the right (left) of the display",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x22,
        subsets: CRT,
        v20_name: "Horizontal Size",
        desc: "Increase/decrease the width of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x24,
        subsets: CRT,
        v20_name: "Horizontal Pincushion",
        desc: "Increasing (decreasing) this value causes the right and left sides of the image to become more (less) convex",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x26,
        subsets: CRT,
        v20_name: "Horizontal Pincushion Balance",
        desc: "Increasing (decreasing) this value moves the center section of the image toward the right (left) side of the display",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x28,
        subsets: CRT,
        v20_name: "Horizontal Convergence R/B",
        desc: "Increasing (decreasing) this value shifts the red pixels to the right (left) and the blue pixels left (right) across the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x29,
        subsets: CRT,
        v20_name: "Horizontal Convergence M/G",
        desc: "Increasing (decreasing) this value shifts the magenta pixels to the right (left) and the green pixels left (right) across the image",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x2a,
        subsets: CRT,
        v20_name: "Horizontal Linearity",
        desc: "Increase/decrease the density of pixels in the image center",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x2c,
        subsets: CRT,
        v20_name: "Horizontal Linearity Balance",
        desc: "Increasing (decreasing) this value shifts the density of pixels from the left (right) side to the right (left) side of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x2e,
        subsets: COLOR,
        v20_name: "Gray scale expansion",
        desc: "Expand the gray scale in the near white region, the near black region, or both",
        v22_flags: RW_SNC,
        values: Some(GRAY_SCALE_EXPANSION),
        ..D
    },
    FeatureEntry {
        code: 0x30,
        subsets: CRT,
        v20_name: "Vertical Position (Phase)",
        desc: "Increasing (decreasing) this value moves the image toward the top (bottom) edge of the display",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x32,
        subsets: CRT,
        v20_name: "Vertical Size",
        desc: "Increase/decrease the height of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x34,
        subsets: CRT,
        v20_name: "Vertical Pincushion",
        desc: "Increasing (decreasing) this value will cause the top and bottom edges of the image to become more (less) convex",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x36,
        subsets: CRT,
        v20_name: "Vertical Pincushion Balance",
        desc: "Increasing (decreasing) this value will move the center section of the image toward the top (bottom) edge of the display",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x38,
        subsets: CRT,
        v20_name: "Vertical Convergence R/B",
        desc: "Increasing (decreasing) this value shifts the red pixels up (down) across the image and the blue pixels down (up)",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x39,
        subsets: CRT,
        v20_name: "Vertical Convergence M/G",
        desc: "Increasing (decreasing) this value shifts the magenta pixels up (down) across the image and the green pixels down (up)",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x3a,
        subsets: CRT,
        v20_name: "Vertical Linearity",
        desc: "Increase/decrease the density of scan lines in the image center",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x3c,
        subsets: CRT,
        v20_name: "Vertical Linearity Balance",
        desc: "Increase/decrease the density of scan lines in the image center",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x3e,
        subsets: CRT,
        v20_name: "Clock phase",
        desc: "Increase/decrease the sampling clock phase shift",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x40,
        subsets: CRT,
        v20_name: "Horizontal Parallelogram",
        desc: "Increasing (decreasing) this value shifts the top section of the image to the right (left) with respect to the bottom section of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x41,
        subsets: CRT,
        v20_name: "Vertical Parallelogram",
        desc: "Increasing (decreasing) this value shifts the top section of the image to the right (left) with respect to the bottom section of the image",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x42,
        subsets: CRT,
        v20_name: "Horizontal Keystone",
        desc: "Increasing (decreasing) this value will increase (decrease) the ratio between the horizontal size at the top of the image and the size at the bottom",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x43,
        subsets: CRT,
        v20_name: "Vertical Keystone",
        desc: "Increasing (decreasing) this value will increase (decrease) the ratio between the vertical size at the left of the image and the size at the right",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x44,
        subsets: CRT,
        v20_name: "Rotation",
        desc: "Increasing (decreasing) this value rotates the image (counter) clockwise around the center point of the screen",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x46,
        subsets: CRT,
        v20_name: "Top Corner Flare",
        desc: "Increase/decrease the distance between the left and right sides at the top of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x48,
        subsets: CRT,
        v20_name: "Top Corner Hook",
        desc: "Increasing (decreasing) this value moves the top of the image to the right (left)",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x4a,
        subsets: CRT,
        v20_name: "Bottom Corner Flare",
        desc: "Increase/decrease the distance between the left and right sides at the bottom of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x4c,
        subsets: CRT,
        v20_name: "Bottom Corner Hook",
        desc: "Increasing (decreasing) this value moves the bottom end of the image to the right (left)",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x52,
        v20_name: "Active control",
        desc: "Read id of one feature that has changed, 0x00 indicates no more",
        v20_flags: RO_CNC,
        formatter: Formatter::ActiveControl,
        ..D
    },
    FeatureEntry {
        code: 0x54,
        v20_name: "Performance Preservation",
        desc: "Controls features aimed at preserving display performance",
        v22_flags: RW_CNC,
        values: Some(PERFORMANCE_PRESERVATION),
        ..D
    },
    FeatureEntry {
        code: 0x56,
        subsets: CRT,
        v20_name: "Horizontal Moire",
        desc: "Increase/decrease horizontal moire cancellation",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x58,
        subsets: CRT,
        v20_name: "Vertical Moire",
        desc: "Increase/decrease vertical moire cancellation",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x59,
        subsets: COLOR,
        v20_name: "6 axis saturation: Red",
        desc: "Increase/decrease red saturation",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x5a,
        subsets: COLOR,
        v20_name: "6 axis saturation: Yellow",
        desc: "Increase/decrease yellow saturation",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x5b,
        subsets: COLOR,
        v20_name: "6 axis saturation: Green",
        desc: "Increase/decrease green saturation",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x5c,
        subsets: COLOR,
        v20_name: "6 axis saturation: Cyan",
        desc: "Increase/decrease cyan saturation",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x5d,
        subsets: COLOR,
        v20_name: "6 axis saturation: Blue",
        desc: "Increase/decrease blue saturation",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x5e,
        subsets: COLOR,
        v20_name: "6 axis saturation: Magenta",
        desc: "Increase/decrease magenta saturation",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x60,
        v20_name: "Input Source",
        desc: "Selects active video source",
        v20_flags: RW_SNC,
        values: Some(INPUT_SOURCE),
        ..D
    },
    FeatureEntry {
        code: 0x62,
        subsets: AUDIO,
        v20_name: "Audio speaker volume",
        desc: "Adjusts speaker volume",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x63,
        subsets: AUDIO,
        v20_name: "Speaker Select",
        desc: "Selects a group of speakers",
        v21_flags: RW_SNC,
        values: Some(SPEAKER_SELECT),
        ..D
    },
    FeatureEntry {
        code: 0x64,
        subsets: AUDIO,
        v20_name: "Audio: Microphone Volume",
        desc: "Increase/decrease microphone gain",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x66,
        v20_name: "Ambient light sensor",
        desc: "Enable/Disable ambient light sensor",
        v22_flags: RW_SNC,
        values: Some(AMBIENT_LIGHT_SENSOR),
        ..D
    },
    FeatureEntry {
        code: 0x6b,
        subsets: COLOR,
        v20_name: "Backlight Level: White",
        desc: "Increase/decrease the white backlight level",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x6c,
        subsets: PROFILE | COLOR,
        v20_name: "Video black level: Red",
        desc: "Increase/decrease the black level of red pixels",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x6d,
        subsets: COLOR,
        v20_name: "Backlight Level: Red",
        desc: "Increase/decrease the red backlight level",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x6e,
        subsets: PROFILE | COLOR,
        v20_name: "Video black level: Green",
        desc: "Increase/decrease the black level of green pixels",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x6f,
        subsets: COLOR,
        v20_name: "Backlight Level: Green",
        desc: "Increase/decrease the green backlight level",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x70,
        subsets: PROFILE | COLOR,
        v20_name: "Video black level: Blue",
        desc: "Increase/decrease the black level of blue pixels",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x71,
        subsets: COLOR,
        v20_name: "Backlight Level: Blue",
        desc: "Increase/decrease the blue backlight level",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x72,
        subsets: COLOR,
        v20_name: "Gamma",
        desc: "Select relative or absolute gamma",
        v21_flags: RW_CNC,
        formatter: Formatter::Gamma,
        ..D
    },
    FeatureEntry {
        code: 0x73,
        subsets: LUT,
        v20_name: "LUT Size",
        desc: "Provides the size (number of entries and number of bits/entry) for the Red/Green/Blue LUT in the display",
        v20_flags: RO_T,
        ..D
    },
    FeatureEntry {
        code: 0x74,
        subsets: LUT,
        v20_name: "Single point LUT operation",
        desc: "Allows a single point within a display's color LUT to be loaded",
        v20_flags: RW_T,
        ..D
    },
    FeatureEntry {
        code: 0x75,
        subsets: LUT,
        v20_name: "Block LUT operation",
        desc: "Allows a single point within a display's color LUT to be loaded",
        v20_flags: RW_T,
        ..D
    },
    FeatureEntry {
        code: 0x76,
        subsets: LUT,
        v20_name: "Remote Procedure Call",
        desc: "Initiates a routine resident in the display",
        v20_flags: WO_T,
        ..D
    },
    FeatureEntry {
        code: 0x78,
        v20_name: "Display Identification Operation",
        desc: "Causes a selected 128 byte block of Display Identification Data (EDID or Display ID) to be read",
        v21_flags: RO_T,
        ..D
    },
    FeatureEntry {
        code: 0x7a,
        v20_name: "Adjust Focal Plane",
        desc: "Increase/decrease the distance to the focal plane of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x7c,
        v20_name: "Adjust Zoom",
        desc: "Increase/decrease the distance to the zoom function of the projection lens (optics)",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x7e,
        subsets: CRT,
        v20_name: "Trapezoid",
        desc: "Increase/decrease the trapezoid distortion in the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x80,
        subsets: CRT,
        v20_name: "Keystone",
        desc: "Increase/decrease the keystone distortion in the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x82,
        v20_name: "Horizontal Mirror (Flip)",
        desc: "Flip picture horizontally",
        v20_flags: RW_SNC,
        values: Some(MIRROR),
        ..D
    },
    FeatureEntry {
        code: 0x84,
        v20_name: "Vertical Mirror (Flip)",
        desc: "Flip picture vertically",
        v20_flags: RW_SNC,
        values: Some(MIRROR),
        ..D
    },
    FeatureEntry {
        code: 0x86,
        v20_name: "Display Scaling",
        desc: "Control the scaling (input vs output) of the display",
        v20_flags: RW_SNC,
        values: Some(DISPLAY_SCALING),
        ..D
    },
    FeatureEntry {
        code: 0x87,
        v20_name: "Sharpness",
        desc: "Specifies one of a range of algorithms",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x88,
        v20_name: "Velocity Scan Modulation",
        desc: "Increase (decrease) the velocity modulation of the horizontal scan as a function of the video level",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x8a,
        subsets: COLOR,
        v20_name: "Color Saturation",
        v22_name: Some("Color Saturation"),
        desc: "Increase/decrease the amplitude of the color difference components of the video signal",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x8b,
        subsets: TV,
        v20_name: "TV Channel Up/Down",
        desc: "Increment (1) or decrement (2) television channel",
        v20_flags: WO_SNC,
        values: Some(TV_CHANNEL),
        ..D
    },
    FeatureEntry {
        code: 0x8c,
        subsets: TV,
        v20_name: "TV Sharpness",
        desc: "Increase/decrease the amplitude of the high frequency components of the video signal",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x8d,
        subsets: AUDIO | TV,
        v20_name: "Audio Mute",
        v22_name: Some("Audio mute/Screen blank"),
        desc: "Mute/unmute audio, and (v2.2) screen blank",
        v20_flags: RW_SNC,
        v22_flags: RW_CNC,
        values: Some(AUDIO_MUTE),
        formatter: Formatter::AudioMute,
        ..D
    },
    FeatureEntry {
        code: 0x8e,
        subsets: TV,
        v20_name: "TV Contrast",
        desc: "Increase/decrease the ratio between blacks and whites in the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x8f,
        subsets: AUDIO,
        v20_name: "Audio Treble",
        desc: "Emphasize/de-emphasize high frequency audio",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x90,
        subsets: COLOR,
        v20_name: "Hue",
        desc: "Wide range color adjustment of all colors simultaneously",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x91,
        subsets: AUDIO,
        v20_name: "Audio Bass",
        desc: "Emphasize/de-emphasize low frequency audio",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x92,
        subsets: TV,
        v20_name: "TV Black level/Luminesence",
        desc: "Increase/decrease the black level of the video",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x93,
        subsets: AUDIO,
        v20_name: "Audio Balance L/R",
        desc: "Controls left/right audio balance",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x94,
        subsets: AUDIO,
        v20_name: "Audio Processor Mode",
        desc: "Select audio mode",
        v20_flags: RW_SNC,
        values: Some(AUDIO_PROCESSOR_MODE),
        ..D
    },
    FeatureEntry {
        code: 0x95,
        subsets: WINDOW,
        v20_name: "Window Position(TL_X)",
        desc: "Top left X pixel of an area of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x96,
        subsets: WINDOW,
        v20_name: "Window Position(TL_Y)",
        desc: "Top left Y pixel of an area of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x97,
        subsets: WINDOW,
        v20_name: "Window Position(BR_X)",
        desc: "Bottom right X pixel of an area of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x98,
        subsets: WINDOW,
        v20_name: "Window Position(BR_Y)",
        desc: "Bottom right Y pixel of an area of the image",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x99,
        subsets: WINDOW,
        v20_name: "Window control on/off",
        desc: "Enables the brightness and color within a window to be different from the desktop",
        v20_flags: RW_SNC,
        v22_flags: RW_SNC.union(DEPRECATED),
        values: Some(WINDOW_CONTROL),
        ..D
    },
    FeatureEntry {
        code: 0x9a,
        subsets: WINDOW,
        v20_name: "Window background",
        desc: "Changes the contrast ratio between the area of the window and the rest of the desktop",
        v20_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x9b,
        subsets: COLOR,
        v20_name: "6 axis hue control: Red",
        desc: "Decrease shifts toward magenta, increase shifts toward yellow",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x9c,
        subsets: COLOR,
        v20_name: "6 axis hue control: Yellow",
        desc: "Decrease shifts toward green, increase shifts toward red",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x9d,
        subsets: COLOR,
        v20_name: "6 axis hue control: Green",
        desc: "Decrease shifts toward yellow, increase shifts toward cyan",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x9e,
        subsets: COLOR,
        v20_name: "6 axis hue control: Cyan",
        desc: "Decrease shifts toward green, increase shifts toward blue",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0x9f,
        subsets: COLOR,
        v20_name: "6 axis hue control: Blue",
        desc: "Decrease shifts toward cyan, increase shifts toward magenta",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0xa0,
        subsets: COLOR,
        v20_name: "6 axis hue control: Magenta",
        desc: "Decrease shifts toward blue, increase shifts toward red",
        v21_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0xa2,
        v20_name: "Auto setup on/off",
        desc: "Turn on/off an auto setup function",
        v20_flags: WO_SNC,
        values: Some(AUTO_SETUP_ON_OFF),
        ..D
    },
    FeatureEntry {
        code: 0xa4,
        subsets: WINDOW,
        v20_name: "Window mask control",
        desc: "Turn selected window operation on/off, window mask",
        v20_flags: RW_CNC,
        values: Some(WINDOW_MASK_CONTROL),
        ..D
    },
    FeatureEntry {
        code: 0xa5,
        subsets: WINDOW,
        v20_name: "Change the selected window",
        desc: "Change selected window (as defined by 95h..98h)",
        v20_flags: RW_SNC,
        values: Some(WINDOW_SELECT),
        ..D
    },
    FeatureEntry {
        code: 0xaa,
        v20_name: "Screen Orientation",
        desc: "Indicates screen orientation",
        v20_flags: RO_SNC,
        values: Some(SCREEN_ORIENTATION),
        ..D
    },
    FeatureEntry {
        code: 0xac,
        v20_name: "Horizontal frequency",
        desc: "Horizontal synchronization signal frequency in Hz as determined by the display",
        v20_flags: RO_CNC,
        formatter: Formatter::HorizontalFrequency,
        ..D
    },
    FeatureEntry {
        code: 0xae,
        v20_name: "Vertical frequency",
        desc: "Vertical synchronization signal frequency in 0.01Hz as determined by the display",
        v20_flags: RO_CNC,
        formatter: Formatter::VerticalFrequency,
        ..D
    },
    FeatureEntry {
        code: 0xb0,
        v20_name: "Settings",
        desc: "Store/restore the user saved values for the current mode",
        v20_flags: WO_SNC,
        values: Some(SETTINGS),
        ..D
    },
    FeatureEntry {
        code: 0xb2,
        v20_name: "Flat panel sub-pixel layout",
        desc: "LCD sub-pixel structure",
        v20_flags: RO_SNC,
        values: Some(SUBPIXEL_LAYOUT),
        ..D
    },
    FeatureEntry {
        code: 0xb4,
        v20_name: "Source Timing Mode",
        desc: "Indicates timing mode being sent by host",
        v21_flags: RW_T,
        ..D
    },
    FeatureEntry {
        code: 0xb5,
        v20_name: "Source Color Coding",
        desc: "Allows the host to specify the color coding method that is being used",
        v22_flags: RW_SNC,
        values: Some(SOURCE_COLOR_CODING),
        ..D
    },
    FeatureEntry {
        code: 0xb6,
        v20_name: "Display technology type",
        desc: "Indicates the base technology type",
        v20_flags: RO_SNC,
        values: Some(DISPLAY_TECHNOLOGY),
        ..D
    },
    FeatureEntry {
        code: 0xb7,
        subsets: DPVL,
        v20_name: "Monitor status",
        desc: "Video mode and status of a DPVL capable monitor",
        v22_flags: RO_SNC,
        values: Some(MONITOR_STATUS),
        ..D
    },
    FeatureEntry {
        code: 0xb8,
        subsets: DPVL,
        v20_name: "Packet count",
        desc: "Counter for DPVL packets received",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0xb9,
        subsets: DPVL,
        v20_name: "Monitor X origin",
        desc: "X origin of the monitor in the vertical screen",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0xba,
        subsets: DPVL,
        v20_name: "Monitor Y origin",
        desc: "Y origin of the monitor in the vertical screen",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0xbb,
        subsets: DPVL,
        v20_name: "Header error count",
        desc: "Error counter for the DPVL header",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0xbc,
        subsets: DPVL,
        v20_name: "Body CRC error count",
        desc: "CRC error counter for the DPVL body",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0xbd,
        subsets: DPVL,
        v20_name: "Client ID",
        desc: "Assigned identification number for the monitor",
        v22_flags: RW_C,
        ..D
    },
    FeatureEntry {
        code: 0xbe,
        subsets: DPVL,
        v20_name: "Link control",
        desc: "Indicates status of the DVI link",
        v22_flags: RW_SNC,
        values: Some(LINK_CONTROL),
        ..D
    },
    FeatureEntry {
        code: 0xc0,
        v20_name: "Display usage time",
        desc: "Returns the current value (in hours) of active power on time accumulated by the display",
        v20_flags: RO_CNC,
        formatter: Formatter::UsageTime,
        ..D
    },
    FeatureEntry {
        code: 0xc2,
        v20_name: "Display descriptor length",
        desc: "Length in bytes of non-volatile storage in the display available for writing a display descriptor",
        v20_flags: RO_C,
        ..D
    },
    FeatureEntry {
        code: 0xc3,
        v20_name: "Transmit display descriptor",
        desc: "Allows a display descriptor to be written to the display",
        v20_flags: RW_T,
        ..D
    },
    FeatureEntry {
        code: 0xc4,
        v20_name: "Enable display of 'display descriptor'",
        desc: "If enabled, the display descriptor shall be displayed when no video is being received",
        v20_flags: RW_SNC,
        values: Some(DISPLAY_DESCRIPTOR_ENABLE),
        ..D
    },
    FeatureEntry {
        code: 0xc6,
        v20_name: "Application enable key",
        desc: "A 2 byte value used to allow an application to only operate with known products",
        v20_flags: RO_CNC,
        formatter: Formatter::ApplicationKey,
        ..D
    },
    FeatureEntry {
        code: 0xc8,
        v20_name: "Display controller type",
        desc: "Mfg id of controller and 2 byte manufacturer-specific controller type",
        v20_flags: RW_CNC,
        values: Some(DISPLAY_CONTROLLER_MFG),
        formatter: Formatter::DisplayControllerType,
        ..D
    },
    FeatureEntry {
        code: 0xc9,
        v20_name: "Display firmware level",
        desc: "2 byte firmware level",
        v20_flags: RO_CNC,
        formatter: Formatter::FirmwareLevel,
        ..D
    },
    FeatureEntry {
        code: 0xca,
        v20_name: "OSD",
        v22_name: Some("OSD/Button Control"),
        desc: "Sets and indicates the current operational state of the OSD (and buttons in v2.2)",
        v20_flags: RW_SNC,
        values: Some(OSD),
        v22_values: Some(OSD_BUTTON_CONTROL),
        ..D
    },
    FeatureEntry {
        code: 0xcc,
        v20_name: "OSD Language",
        desc: "On Screen Display language",
        v20_flags: RW_SNC,
        values: Some(OSD_LANGUAGE),
        ..D
    },
    FeatureEntry {
        code: 0xcd,
        v20_name: "Status Indicators",
        desc: "Control up to 16 LED (or similar) indicators to indicate system status",
        v22_flags: RW_SNC,
        values: Some(STATUS_INDICATORS),
        ..D
    },
    FeatureEntry {
        code: 0xce,
        v20_name: "Auxiliary display size",
        desc: "Rows and characters/row of auxiliary display",
        v22_flags: RO_CNC,
        formatter: Formatter::Generic,
        ..D
    },
    FeatureEntry {
        code: 0xcf,
        v20_name: "Auxiliary display data",
        desc: "Sets contents of auxiliary display",
        v22_flags: WO_T,
        ..D
    },
    FeatureEntry {
        code: 0xd0,
        v20_name: "Output select",
        desc: "Selects the active output",
        v20_flags: RW_SNC,
        values: Some(INPUT_SOURCE),
        ..D
    },
    FeatureEntry {
        code: 0xd2,
        v20_name: "Asset Tag",
        desc: "Read an Asset Tag to/from the display",
        v22_flags: RW_T,
        ..D
    },
    FeatureEntry {
        code: 0xd4,
        v20_name: "Stereo video mode",
        desc: "Stereo video mode",
        v22_flags: RW_SNC,
        values: Some(STEREO_VIDEO_MODE),
        ..D
    },
    FeatureEntry {
        code: 0xd6,
        v20_name: "Power mode",
        desc: "DPM and DPMS status",
        v20_flags: RW_SNC,
        values: Some(POWER_MODE),
        ..D
    },
    FeatureEntry {
        code: 0xd7,
        v20_name: "Auxiliary power output",
        desc: "Controls an auxiliary power output from a display to a host device",
        v21_flags: RW_SNC,
        values: Some(AUXILIARY_POWER),
        ..D
    },
    FeatureEntry {
        code: 0xda,
        v20_name: "Scan mode",
        desc: "Controls scan characteristics (aka format)",
        v20_flags: RW_SNC,
        values: Some(SCAN_MODE),
        ..D
    },
    FeatureEntry {
        code: 0xdb,
        v20_name: "Image Mode",
        desc: "Controls aspects of the displayed image (TV applications)",
        v21_flags: RW_SNC,
        values: Some(IMAGE_MODE),
        ..D
    },
    FeatureEntry {
        code: 0xdc,
        v20_name: "Display Mode",
        desc: "Type of application used on display",
        v20_flags: RW_SNC,
        values: Some(DISPLAY_MODE),
        v30_values: Some(DISPLAY_MODE_V30),
        ..D
    },
    FeatureEntry {
        code: 0xde,
        v20_name: "Scratch Pad",
        desc: "Operation mode (2.0) or scratch pad (2.1 and later)",
        v20_flags: RW_CNC,
        values: Some(OPERATION_MODE),
        formatter: Formatter::Generic,
        ..D
    },
    FeatureEntry {
        code: 0xdf,
        v20_name: "VCP Version",
        desc: "MCCS version",
        v20_flags: RO_CNC,
        formatter: Formatter::Version,
        ..D
    },
];
