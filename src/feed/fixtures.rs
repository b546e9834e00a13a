pub const PODCAST_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>My Podcast</title>
    <link>https://mypodcast.com</link>
    <description>Talking about things</description>
    <language>de-AT</language>
    <item>
      <guid>episode-1</guid>
      <title>First Episode</title>
      <link>https://mypodcast.com/1</link>
      <enclosure url="https://mypodcast.com/1.mp3" length="1234" type="audio/mpeg"/>
      <pubDate>Mon, 06 Jan 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <guid>episode-2</guid>
      <title>Second Episode</title>
      <link>https://mypodcast.com/2</link>
    </item>
  </channel>
</rss>"#;

pub const EMPTY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Nothing Yet</title>
    <link>https://empty.example</link>
    <description>No episodes</description>
  </channel>
</rss>"#;
