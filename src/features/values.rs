//! Value name tables for non-continuous features.
//!
//! Each table is an ordered sequence of `(sl, name)` pairs. A value of `0xFF`
//! that is not listed is reserved for the manufacturer.

/// A value name table.
pub type ValueTable = &'static [(u8, &'static str)];

/// Looks up the name of `value` in `table`.
pub fn value_name(table: ValueTable, value: u8) -> Option<&'static str> {
    table.iter().find(|&&(v, _)| v == value).map(|&(_, name)| name)
}

pub const NEW_CONTROL_VALUE: ValueTable = &[
    (0x01, "No new control values"),
    (0x02, "One or more new control values have been saved"),
    (0xff, "No user controls are present"),
];

pub const SOFT_CONTROLS: ValueTable = &[
    (0x00, "No button active"),
    (0x01, "Button 1 active"),
    (0x02, "Button 2 active"),
    (0x03, "Button 3 active"),
    (0x04, "Button 4 active"),
    (0x05, "Button 5 active"),
    (0x06, "Button 6 active"),
    (0x07, "Button 7 active"),
    (0xff, "No user controls are present"),
];

pub const COLOR_PRESET: ValueTable = &[
    (0x01, "sRGB"),
    (0x02, "Display Native"),
    (0x03, "4000 K"),
    (0x04, "5000 K"),
    (0x05, "6500 K"),
    (0x06, "7500 K"),
    (0x07, "8200 K"),
    (0x08, "9300 K"),
    (0x09, "10000 K"),
    (0x0a, "11500 K"),
    (0x0b, "User 1"),
    (0x0c, "User 2"),
    (0x0d, "User 3"),
];

pub const COLOR_PRESET_TOLERANCE: ValueTable = &[
    (0x00, "Unspecified"),
    (0x01, "1%"),
    (0x02, "2%"),
    (0x03, "3%"),
    (0x04, "4%"),
    (0x05, "5%"),
    (0x06, "6%"),
    (0x07, "7%"),
    (0x08, "8%"),
    (0x09, "9%"),
    (0x0a, "10%"),
];

pub const FLESH_TONE_ENHANCEMENT: ValueTable = &[
    (0x00, "Disabled"),
    (0x01, "Enabled"),
];

pub const AUTO_SETUP: ValueTable = &[
    (0x00, "Auto setup not active"),
    (0x01, "Performing auto setup"),
    (0x02, "Enable continuous/periodic auto setup"),
];

pub const GRAY_SCALE_EXPANSION: ValueTable = &[
    (0x00, "No expansion"),
    (0x01, "Expansion enabled"),
];

pub const PERFORMANCE_PRESERVATION: ValueTable = &[
    (0x00, "No preservation action"),
    (0x01, "Pixel orbiting"),
    (0x02, "Reduced brightness"),
];

pub const INPUT_SOURCE: ValueTable = &[
    (0x01, "VGA-1"),
    (0x02, "VGA-2"),
    (0x03, "DVI-1"),
    (0x04, "DVI-2"),
    (0x05, "Composite video 1"),
    (0x06, "Composite video 2"),
    (0x07, "S-Video-1"),
    (0x08, "S-Video-2"),
    (0x09, "Tuner-1"),
    (0x0a, "Tuner-2"),
    (0x0b, "Tuner-3"),
    (0x0c, "Component video (YPrPb/YCrCb) 1"),
    (0x0d, "Component video (YPrPb/YCrCb) 2"),
    (0x0e, "Component video (YPrPb/YCrCb) 3"),
    (0x0f, "DisplayPort-1"),
    (0x10, "DisplayPort-2"),
    (0x11, "HDMI-1"),
    (0x12, "HDMI-2"),
    (0x13, "USB-C-1"),
    (0x14, "USB-C-2"),
];

pub const SPEAKER_SELECT: ValueTable = &[
    (0x00, "Front L/R"),
    (0x01, "Side L/R"),
    (0x02, "Rear L/R"),
    (0x03, "Center/Subwoofer"),
];

pub const AMBIENT_LIGHT_SENSOR: ValueTable = &[
    (0x01, "Disabled"),
    (0x02, "Enabled"),
];

pub const MIRROR: ValueTable = &[
    (0x00, "Normal mode"),
    (0x01, "Mirrored mode"),
];

pub const DISPLAY_SCALING: ValueTable = &[
    (0x01, "No scaling"),
    (0x02, "Max image, no aspect ratio distortion"),
    (0x03, "Max vertical image, no aspect ratio distortion"),
    (0x04, "Max horizontal image, no aspect ratio distortion"),
    (0x05, "Max vertical image with aspect ratio distortion"),
    (0x06, "Max horizontal image with aspect ratio distortion"),
    (0x07, "Linear expansion (compression) on horizontal axis"),
    (0x08, "Linear expansion (compression) on h and v axes"),
    (0x09, "Squeeze mode"),
    (0x0a, "Non-linear expansion"),
];

pub const TV_CHANNEL: ValueTable = &[
    (0x01, "Increment channel"),
    (0x02, "Decrement channel"),
];

pub const AUDIO_MUTE: ValueTable = &[
    (0x01, "Mute the audio"),
    (0x02, "Unmute the audio"),
];

pub const SCREEN_BLANK: ValueTable = &[
    (0x01, "Blank the screen"),
    (0x02, "Unblank the screen"),
];

pub const AUDIO_PROCESSOR_MODE: ValueTable = &[
    (0x00, "Speaker off/Audio not supported"),
    (0x01, "Mono"),
    (0x02, "Stereo"),
    (0x03, "Stereo expanded"),
    (0x11, "SRS 2.0"),
    (0x12, "SRS 2.1"),
    (0x13, "SRS 3.1"),
    (0x14, "SRS 4.1"),
    (0x15, "SRS 5.1"),
    (0x16, "SRS 6.1"),
    (0x17, "SRS 7.1"),
    (0x21, "Dolby 2.0"),
    (0x22, "Dolby 2.1"),
    (0x23, "Dolby 3.1"),
    (0x24, "Dolby 4.1"),
    (0x25, "Dolby 5.1"),
    (0x26, "Dolby 6.1"),
    (0x27, "Dolby 7.1"),
    (0x31, "THX 2.0"),
    (0x32, "THX 2.1"),
    (0x33, "THX 3.1"),
    (0x34, "THX 4.1"),
    (0x35, "THX 5.1"),
    (0x36, "THX 6.1"),
    (0x37, "THX 7.1"),
];

pub const WINDOW_CONTROL: ValueTable = &[
    (0x00, "No effect"),
    (0x01, "Off"),
    (0x02, "On"),
];

pub const AUTO_SETUP_ON_OFF: ValueTable = &[
    (0x01, "Turn off auto setup"),
    (0x02, "Turn on auto setup"),
];

pub const WINDOW_SELECT: ValueTable = &[
    (0x00, "Full display image area selected except active windows"),
    (0x01, "Window 1 selected"),
    (0x02, "Window 2 selected"),
    (0x03, "Window 3 selected"),
    (0x04, "Window 4 selected"),
    (0x05, "Window 5 selected"),
    (0x06, "Window 6 selected"),
    (0x07, "Window 7 selected"),
];

pub const SCREEN_ORIENTATION: ValueTable = &[
    (0x01, "0 degrees"),
    (0x02, "90 degrees"),
    (0x03, "180 degrees"),
    (0x04, "270 degrees"),
    (0xff, "Display cannot supply orientation"),
];

pub const SETTINGS: ValueTable = &[
    (0x01, "Store current settings in the monitor"),
    (0x02, "Restore factory defaults for current mode"),
];

pub const SUBPIXEL_LAYOUT: ValueTable = &[
    (0x00, "Sub-pixel layout not defined"),
    (0x01, "Red/Green/Blue vertical stripe"),
    (0x02, "Red/Green/Blue horizontal stripe"),
    (0x03, "Blue/Green/Red vertical stripe"),
    (0x04, "Blue/Green/Red horizontal stripe"),
    (0x05, "Quad pixel, red at top left"),
    (0x06, "Quad pixel, red at bottom left"),
    (0x07, "Delta (triad)"),
    (0x08, "Mosaic"),
];

pub const SOURCE_COLOR_CODING: ValueTable = &[
    (0x00, "Reserved"),
    (0x01, "8 bit RGB"),
    (0x02, "10 bit RGB"),
    (0x03, "12 bit RGB"),
    (0x04, "8 bit YCbCr 4:4:4"),
    (0x05, "10 bit YCbCr 4:4:4"),
    (0x06, "12 bit YCbCr 4:4:4"),
    (0x07, "8 bit YCbCr 4:2:2"),
    (0x08, "10 bit YCbCr 4:2:2"),
];

pub const DISPLAY_TECHNOLOGY: ValueTable = &[
    (0x01, "CRT (shadow mask)"),
    (0x02, "CRT (aperture grill)"),
    (0x03, "LCD (active matrix)"),
    (0x04, "LCos"),
    (0x05, "Plasma"),
    (0x06, "OLED"),
    (0x07, "EL"),
    (0x08, "Dynamic MEM"),
    (0x09, "Static MEM"),
];

pub const LINK_CONTROL: ValueTable = &[
    (0x00, "Link shutdown disabled"),
    (0x01, "Link shutdown enabled"),
];

pub const DISPLAY_DESCRIPTOR_ENABLE: ValueTable = &[
    (0x00, "Display descriptor disabled"),
    (0x01, "Display descriptor enabled"),
];

pub const DISPLAY_CONTROLLER_MFG: ValueTable = &[
    (0x01, "Conexant"),
    (0x02, "Genesis"),
    (0x03, "Macronix"),
    (0x04, "IDT"),
    (0x05, "Mstar"),
    (0x06, "Myson"),
    (0x07, "Phillips"),
    (0x08, "PixelWorks"),
    (0x09, "RealTek"),
    (0x0a, "Sage"),
    (0x0b, "Silicon Image"),
    (0x0c, "SmartASIC"),
    (0x0d, "STMicroelectronics"),
    (0x0e, "Topro"),
    (0x0f, "Trumpion"),
    (0x10, "Welltrend"),
    (0x11, "Samsung"),
    (0x12, "Novatek"),
    (0x13, "STK"),
    (0x14, "Silicon Optics"),
    (0x15, "Texas Instruments"),
    (0x16, "Analogix"),
    (0x17, "Quantum Data"),
    (0x18, "NXP Semiconductors"),
    (0x19, "Chrontel"),
    (0x1a, "Parade Technologies"),
    (0x1b, "THine Electronics"),
    (0x1c, "Trident"),
    (0x1d, "Micros"),
    (0xff, "Not defined - a manufacturer designed controller"),
];

pub const OSD: ValueTable = &[
    (0x01, "OSD Disabled"),
    (0x02, "OSD Enabled"),
    (0xff, "Display cannot supply this information"),
];

pub const OSD_BUTTON_CONTROL: ValueTable = &[
    (0x00, "Host control of power unsupported"),
    (0x01, "Power button disabled, OSD menu buttons enabled"),
    (0x02, "Power button enabled, OSD menu buttons enabled"),
    (0x03, "Power button disabled, OSD menu buttons disabled"),
];

pub const OSD_LANGUAGE: ValueTable = &[
    (0x00, "Reserved value, must be ignored"),
    (0x01, "Chinese (traditional, Hantai)"),
    (0x02, "English"),
    (0x03, "French"),
    (0x04, "German"),
    (0x05, "Italian"),
    (0x06, "Japanese"),
    (0x07, "Korean"),
    (0x08, "Portuguese (Portugal)"),
    (0x09, "Russian"),
    (0x0a, "Spanish"),
    (0x0b, "Swedish"),
    (0x0c, "Turkish"),
    (0x0d, "Chinese (simplified / Kantai)"),
    (0x0e, "Portuguese (Brazil)"),
    (0x0f, "Arabic"),
    (0x10, "Bulgarian"),
    (0x11, "Croatian"),
    (0x12, "Czech"),
    (0x13, "Danish"),
    (0x14, "Dutch"),
    (0x15, "Estonian"),
    (0x16, "Finnish"),
    (0x17, "Greek"),
    (0x18, "Hebrew"),
    (0x19, "Hindi"),
    (0x1a, "Hungarian"),
    (0x1b, "Latvian"),
    (0x1c, "Lithuanian"),
    (0x1d, "Norwegian"),
    (0x1e, "Polish"),
    (0x1f, "Romanian"),
    (0x20, "Serbian"),
    (0x21, "Slovak"),
    (0x22, "Slovenian"),
    (0x23, "Thai"),
    (0x24, "Ukranian"),
    (0x25, "Vietnamese"),
];

pub const STATUS_INDICATORS: ValueTable = &[
    (0x00, "Serial printing disabled"),
    (0x01, "Serial printing enabled"),
];

pub const STEREO_VIDEO_MODE: ValueTable = &[
    (0x00, "No stereo"),
    (0x01, "Field sequential, right eye first"),
    (0x02, "Field sequential, left eye first"),
    (0x03, "2-way interleaved, right eye first"),
    (0x04, "2-way interleaved, left eye first"),
    (0x05, "Column interleave, right eye first"),
    (0x06, "Column interleave, left eye first"),
];

pub const POWER_MODE: ValueTable = &[
    (0x01, "DPM: On,  DPMS: Off"),
    (0x02, "DPM: Off, DPMS: Standby"),
    (0x03, "DPM: Off, DPMS: Suspend"),
    (0x04, "DPM: Off, DPMS: Off"),
    (0x05, "Write only value to turn off display"),
];

pub const AUXILIARY_POWER: ValueTable = &[
    (0x01, "Disable auxiliary output power"),
    (0x02, "Enable auxiliary output power"),
];

pub const SCAN_MODE: ValueTable = &[
    (0x00, "Normal operation"),
    (0x01, "Underscan"),
    (0x02, "Overscan"),
    (0x03, "Widescreen"),
];

pub const IMAGE_MODE: ValueTable = &[
    (0x00, "No effect"),
    (0x01, "Full mode"),
    (0x02, "Zoom mode"),
    (0x03, "Squeeze mode"),
    (0x04, "Variable"),
];

pub const DISPLAY_MODE: ValueTable = &[
    (0x00, "Standard/Default mode"),
    (0x01, "Productivity"),
    (0x02, "Mixed"),
    (0x03, "Movie"),
    (0x04, "User defined"),
    (0x05, "Games"),
    (0x06, "Sports"),
    (0x07, "Professional (all signal processing disabled)"),
    (0x08, "Standard/Default mode with intermediate power consumption"),
    (0x09, "Standard/Default mode with low power consumption"),
    (0x0a, "Demonstration"),
    (0xf0, "Dynamic contrast"),
];

pub const DISPLAY_MODE_V30: ValueTable = &[
    (0x00, "Standard/Default mode"),
    (0x01, "Productivity"),
    (0x02, "Mixed"),
    (0x03, "Movie"),
    (0x04, "User defined"),
    (0x05, "Games"),
    (0x06, "Sports"),
    (0x07, "Professional (all signal processing disabled)"),
    (0x08, "Standard/Default mode with intermediate power consumption"),
    (0x09, "Standard/Default mode with low power consumption"),
    (0x0a, "Demonstration"),
];

pub const OPERATION_MODE: ValueTable = &[
    (0x01, "Stand alone"),
    (0x02, "Slave (full PC control)"),
];

pub const MONITOR_STATUS: ValueTable = &[
    (0x00, "Normal"),
    (0x01, "Link error"),
];

pub const WINDOW_MASK_CONTROL: ValueTable = &[
    (0x00, "Window mask off"),
    (0x01, "Window mask on"),
];
