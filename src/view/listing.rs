//! Plain-text listings for playlist, search, favorites and stats replies

use chrono::{DateTime, Utc};

use crate::model::{LinkEntry, PlaylistCollection};

pub const PLAYLIST_PREVIEW_LEN: usize = 10;
pub const SEARCH_PREVIEW_LEN: usize = 10;
pub const FAVORITES_PREVIEW_LEN: usize = 15;

pub const EMPTY_PLAYLIST_BROADCAST: &str =
    "🎵 The playlist is empty. Add Spotify links to the playlist file.";

pub fn playlist_overview(collection: &PlaylistCollection) -> String {
    let mut msg = format!("🎵 **PLAYLIST** (first {}):\n\n", PLAYLIST_PREVIEW_LEN);
    for (i, entry) in collection.iter().take(PLAYLIST_PREVIEW_LEN).enumerate() {
        msg.push_str(&format!("{}. {}\n", i + 1, entry.link));
    }
    if collection.len() > PLAYLIST_PREVIEW_LEN {
        msg.push_str(&format!("\n📊 **Total:** {} tracks", collection.len()));
    }
    msg
}

pub fn search_results(query: &str, matches: &[(usize, LinkEntry)]) -> String {
    if matches.is_empty() {
        return format!("❌ No tracks found matching '{}'", query);
    }

    let mut msg = format!("🔍 **FOUND {} TRACKS:**\n\n", matches.len());
    for (position, entry) in matches.iter().take(SEARCH_PREVIEW_LEN) {
        msg.push_str(&format!("{}. {}\n", position, entry.link));
    }
    if matches.len() > SEARCH_PREVIEW_LEN {
        msg.push_str(&format!("\n... +{} more", matches.len() - SEARCH_PREVIEW_LEN));
    }
    msg
}

pub fn favorites_listing(favorites: &[String]) -> String {
    if favorites.is_empty() {
        return "❌ No favorites saved yet!".to_string();
    }

    let mut msg = format!("❤️ **YOUR {} FAVORITE TRACKS:**\n\n", favorites.len());
    for (i, link) in favorites.iter().take(FAVORITES_PREVIEW_LEN).enumerate() {
        msg.push_str(&format!("{}. {}\n", i + 1, link));
    }
    if favorites.len() > FAVORITES_PREVIEW_LEN {
        msg.push_str(&format!("\n... +{} more", favorites.len() - FAVORITES_PREVIEW_LEN));
    }
    msg
}

pub struct Stats {
    pub playlist_len: usize,
    pub favorites: usize,
    pub interval_minutes: u64,
    pub scheduler_running: bool,
    pub started_at: DateTime<Utc>,
}

pub fn stats(stats: &Stats, now: DateTime<Utc>) -> String {
    let status = if stats.scheduler_running { "✅ Active" } else { "⏸️ Stopped" };
    format!(
        "**📊 BOT STATISTICS**\n\n\
         🎵 **Tracks in playlist:** {}\n\
         ❤️ **Saved favorites:** {}\n\
         ⏱️ **Interval:** {} minutes\n\
         🤖 **Status:** {}\n\
         🕒 **Uptime:** {}",
        stats.playlist_len,
        stats.favorites,
        stats.interval_minutes,
        status,
        format_uptime(now - stats.started_at),
    )
}

pub fn format_uptime(elapsed: chrono::Duration) -> String {
    let total_minutes = elapsed.num_minutes().max(0);
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else {
        format!("{}h {}m", hours, minutes)
    }
}

pub fn help() -> String {
    [
        "**Commands**",
        "`!play [n|text]` send the next track, track #n, or the first match",
        "`!info [n|text]` show details without moving the playlist",
        "`!goto <n>` jump to track #n",
        "`!back` go back one track",
        "`!next` skip ahead one track",
        "`!search <text>` list matching tracks",
        "`!random` send a random track",
        "`!playlist` show the first tracks",
        "`!favorites` / `!clearfavs` list or clear favorites",
        "`!refresh` reload the playlist file",
        "`!reloadlayout` reload the embed template",
        "`!stats` show bot statistics",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn collection(n: usize) -> PlaylistCollection {
        PlaylistCollection::from_links((1..=n).map(|i| format!("https://t/{}", i)))
    }

    #[test]
    fn short_playlist_has_no_total_line() {
        let msg = playlist_overview(&collection(3));
        assert!(msg.contains("3. https://t/3"));
        assert!(!msg.contains("Total"));
    }

    #[test]
    fn long_playlist_is_truncated_with_total() {
        let msg = playlist_overview(&collection(25));
        assert!(msg.contains("10. https://t/10"));
        assert!(!msg.contains("11. https://t/11"));
        assert!(msg.contains("**Total:** 25 tracks"));
    }

    #[test]
    fn search_listing_uses_playlist_positions() {
        let matches = vec![
            (4, LinkEntry::new("https://t/4")),
            (9, LinkEntry::new("https://t/9")),
        ];
        let msg = search_results("t/", &matches);
        assert!(msg.contains("FOUND 2 TRACKS"));
        assert!(msg.contains("9. https://t/9"));
        assert!(search_results("zz", &[]).contains("'zz'"));
    }

    #[test]
    fn favorites_listing_counts_overflow() {
        let favs: Vec<String> = (0..20).map(|i| format!("https://f/{}", i)).collect();
        let msg = favorites_listing(&favs);
        assert!(msg.contains("YOUR 20 FAVORITE"));
        assert!(msg.ends_with("... +5 more"));
    }

    #[test]
    fn stats_report_uptime() {
        let started_at = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 10, 30, 0).unwrap();
        let msg = stats(
            &Stats {
                playlist_len: 42,
                favorites: 3,
                interval_minutes: 30,
                scheduler_running: true,
                started_at,
            },
            now,
        );
        assert!(msg.contains("**Tracks in playlist:** 42"));
        assert!(msg.contains("✅ Active"));
        assert!(msg.contains("1d 2h 30m"));
    }
}
