extern crate udev;

use std::collections::BTreeMap;
use std::io;

/// Adapter names of every `i2c-dev` device known to udev, keyed by bus
/// number.
///
/// Ignorable adapters are included; the caller filters them.
pub fn adapter_names() -> io::Result<BTreeMap<u32, String>> {
    let udev = udev::Context::new()?;
    let mut en = udev::Enumerator::new(&udev)?;
    en.match_subsystem("i2c-dev")?;

    let mut names = BTreeMap::new();
    for dev in en.scan_devices()? {
        let busno = match dev.sysname().to_str()
            .and_then(|s| s.strip_prefix("i2c-"))
            .and_then(|n| n.parse::<u32>().ok()) {
            Some(n) => n,
            None => continue,
        };

        let name = dev.attribute_value("name")
            .map(|name| name.to_string_lossy().trim().to_string())
            .unwrap_or_default();
        names.insert(busno, name);
    }

    Ok(names)
}
