//! Device, OS and browser classification

use crate::openrtb::Device;
use bidroute_core::DeviceType;

/// Classify the device
///
/// Explicit `devicetype` > user-agent heuristics > OS name hints > desktop.
pub fn classify_device(device: Option<&Device>) -> DeviceType {
    let Some(device) = device else {
        return DeviceType::Desktop;
    };

    device
        .devicetype
        .and_then(DeviceType::from_openrtb)
        .or_else(|| device.ua.as_deref().and_then(device_from_user_agent))
        .or_else(|| device.os.as_deref().and_then(device_from_os))
        .unwrap_or(DeviceType::Desktop)
}

/// Tablet and mobile heuristics; `None` when the UA has no signal
pub fn device_from_user_agent(ua: &str) -> Option<DeviceType> {
    let ua = ua.to_ascii_lowercase();

    let is_tablet = ua.contains("ipad")
        || ua.contains("tablet")
        || ua.contains("kindle")
        || ua.contains("silk/")
        || (ua.contains("android") && !ua.contains("mobile"));
    if is_tablet {
        return Some(DeviceType::Tablet);
    }

    let is_mobile = ua.contains("mobi")
        || ua.contains("iphone")
        || ua.contains("ipod")
        || ua.contains("android")
        || ua.contains("windows phone")
        || ua.contains("blackberry");
    if is_mobile {
        return Some(DeviceType::Mobile);
    }

    None
}

fn device_from_os(os: &str) -> Option<DeviceType> {
    match os.trim().to_ascii_lowercase().as_str() {
        "ios" | "android" => Some(DeviceType::Mobile),
        "tvos" | "tizen" | "webos" | "roku" => Some(DeviceType::Ctv),
        _ => None,
    }
}

/// Operating system name from the user-agent, empty when unrecognised
pub fn os_from_user_agent(ua: &str) -> String {
    let ua = ua.to_ascii_lowercase();
    let os = if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") {
        "iOS"
    } else if ua.contains("android") {
        "Android"
    } else if ua.contains("windows") {
        "Windows"
    } else if ua.contains("cros") {
        "ChromeOS"
    } else if ua.contains("mac os x") || ua.contains("macintosh") {
        "macOS"
    } else if ua.contains("tizen") {
        "Tizen"
    } else if ua.contains("web0s") || ua.contains("webos") {
        "webOS"
    } else if ua.contains("roku") {
        "Roku"
    } else if ua.contains("linux") {
        "Linux"
    } else {
        ""
    };
    os.to_string()
}

/// Browser family from the user-agent, empty when unrecognised
///
/// Order matters: most UAs also claim to be Safari and Chrome.
pub fn browser_from_user_agent(ua: &str) -> String {
    let ua = ua.to_ascii_lowercase();
    let browser = if ua.contains("edg/") || ua.contains("edga/") || ua.contains("edgios/") {
        "Edge"
    } else if ua.contains("opr/") || ua.contains("opera") {
        "Opera"
    } else if ua.contains("samsungbrowser") {
        "Samsung Internet"
    } else if ua.contains("firefox") || ua.contains("fxios") {
        "Firefox"
    } else if ua.contains("crios") || ua.contains("chrome") {
        "Chrome"
    } else if ua.contains("safari") {
        "Safari"
    } else {
        ""
    };
    browser.to_string()
}
