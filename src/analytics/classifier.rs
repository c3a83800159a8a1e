//! User-Agent 粗粒度识别
//!
//! 只做子串匹配，按固定优先级取第一个命中项。很多移动浏览器的 UA
//! 同时包含 "Safari"，这里的顺序就是用来打破这种歧义的，不追求精确解析。

use serde::Serialize;

use super::DeviceClass;

const MOBILE_MARKERS: &[&str] = &["mobi", "android"];
const TABLET_MARKERS: &[&str] = &["tablet", "ipad"];

/// (标签, 匹配子串)，按优先级排列
const BROWSERS: &[(&str, &[&str])] = &[
    ("Chrome", &["Chrome"]),
    ("Safari", &["Safari"]),
    ("Firefox", &["Firefox"]),
    ("Internet Explorer", &["MSIE", "Trident"]),
];

const SYSTEMS: &[(&str, &[&str])] = &[
    ("Windows", &["Windows"]),
    ("MacOS", &["Mac"]),
    ("Linux", &["Linux"]),
    ("Android", &["Android"]),
    ("iOS", &["iPhone", "iPad", "iOS"]),
];

const UNKNOWN: &str = "Unknown";

/// 识别设备类别，未提供 UA 时为 desktop
pub fn classify_device(user_agent: Option<&str>) -> DeviceClass {
    let Some(ua) = user_agent else {
        return DeviceClass::Desktop;
    };
    let ua = ua.to_ascii_lowercase();

    if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
        DeviceClass::Mobile
    } else if TABLET_MARKERS.iter().any(|m| ua.contains(m)) {
        DeviceClass::Tablet
    } else {
        DeviceClass::Desktop
    }
}

fn first_match(ua: &str, table: &[(&'static str, &[&str])]) -> &'static str {
    table
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| ua.contains(n)))
        .map(|(label, _)| *label)
        .unwrap_or(UNKNOWN)
}

/// 生成 "<Browser> on <OS>" 形式的描述
pub fn browser_os_label(user_agent: Option<&str>) -> String {
    let ua = user_agent.unwrap_or_default();
    format!(
        "{} on {}",
        first_match(ua, BROWSERS),
        first_match(ua, SYSTEMS)
    )
}

/// 单次请求的客户端识别结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub device: DeviceClass,
    pub label: String,
}

impl ClientInfo {
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        Self {
            device: classify_device(user_agent),
            label: browser_os_label(user_agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/604.1";
    const FIREFOX_LINUX: &str =
        "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
    const IE11: &str = "Mozilla/5.0 (Windows NT 10.0; Trident/7.0; rv:11.0) like Gecko";

    #[test]
    fn test_device_classes() {
        assert_eq!(classify_device(Some(SAFARI_IPHONE)), DeviceClass::Mobile);
        assert_eq!(classify_device(Some("Some MOBI agent")), DeviceClass::Mobile);
        assert_eq!(classify_device(Some(SAFARI_IPAD)), DeviceClass::Tablet);
        assert_eq!(classify_device(Some(CHROME_WINDOWS)), DeviceClass::Desktop);
        assert_eq!(classify_device(Some("")), DeviceClass::Desktop);
        assert_eq!(classify_device(None), DeviceClass::Desktop);
    }

    #[test]
    fn test_android_tablet_counts_as_mobile() {
        // 移动标记优先于平板标记
        let ua = "Mozilla/5.0 (Linux; Android 13; Tablet) AppleWebKit/537.36";
        assert_eq!(classify_device(Some(ua)), DeviceClass::Mobile);
    }

    #[test]
    fn test_labels() {
        assert_eq!(browser_os_label(Some(CHROME_WINDOWS)), "Chrome on Windows");
        assert_eq!(browser_os_label(Some(FIREFOX_LINUX)), "Firefox on Linux");
        assert_eq!(
            browser_os_label(Some(IE11)),
            "Internet Explorer on Windows"
        );
        // "like Mac OS X" 使 MacOS 先于 iOS 命中
        assert_eq!(browser_os_label(Some(SAFARI_IPHONE)), "Safari on MacOS");
        assert_eq!(browser_os_label(Some("curl/8.4.0")), "Unknown on Unknown");
        assert_eq!(browser_os_label(None), "Unknown on Unknown");
    }

    #[test]
    fn test_client_info() {
        let info = ClientInfo::from_user_agent(Some(SAFARI_IPAD));
        assert_eq!(info.device, DeviceClass::Tablet);
        assert_eq!(info.label, "Safari on MacOS");
    }
}
