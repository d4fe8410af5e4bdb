//! `get_rand_user_agent()`: a plausible browser UA string assembled from a
//! small pool of real-world browser/OS/engine fragments.

use rand::Rng;

const BROWSERS: [(&str, &str); 4] = [
    ("Chrome", "124.0.0.0"),
    ("Firefox", "125.0"),
    ("Safari", "17.4"),
    ("Edg", "124.0.0.0"),
];

const PLATFORMS: [&str; 4] = [
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 14_4",
    "X11; Linux x86_64",
    "iPhone; CPU iPhone OS 17_4 like Mac OS X",
];

pub fn rand_user_agent<R: Rng + ?Sized>(rng: &mut R) -> String {
    let (browser, version) = BROWSERS[rng.gen_range(0..BROWSERS.len())];
    let platform = PLATFORMS[rng.gen_range(0..PLATFORMS.len())];
    let webkit = format!("{}.{}", rng.gen_range(530..610), rng.gen_range(0..40));
    format!(
        "Mozilla/5.0 ({platform}) AppleWebKit/{webkit} (KHTML, like Gecko) {browser}/{version} Safari/{webkit}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_like_a_user_agent() {
        let mut rng = rand::thread_rng();
        let ua = rand_user_agent(&mut rng);
        assert!(ua.starts_with("Mozilla/5.0"));
        assert!(ua.contains("AppleWebKit"));
    }
}
