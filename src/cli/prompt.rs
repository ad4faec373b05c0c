//! Interactive prompts for the terminal session

use crate::core::{AudioBitrate, MediaMode, Resolution};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Prompter reading answers from the process's stdin
pub type StdinPrompter = Prompter<BufReader<Stdin>>;

/// Line-based question/answer prompter
pub struct Prompter<R> {
    lines: Lines<R>,
}

impl StdinPrompter {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines() }
    }

    /// Ask for a URL; `None` on end of input or an empty line
    pub async fn url(&mut self) -> std::io::Result<Option<String>> {
        ask("🎯 Enter video URL: ")?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()))
    }

    /// Offer `options` and return the picked one; `None` on end of input.
    ///
    /// Accepts the option's number or its label; an empty answer picks
    /// `default`. Anything else asks again.
    pub async fn choose(&mut self, label: &str, options: &[&str], default: &str) -> std::io::Result<Option<String>> {
        loop {
            println!("{}:", label);
            for (i, option) in options.iter().enumerate() {
                let marker = if option.eq_ignore_ascii_case(default) { " (default)" } else { "" };
                println!("  [{}] {}{}", i + 1, option, marker);
            }
            ask("> ")?;

            let Some(answer) = self.lines.next_line().await? else {
                return Ok(None);
            };
            if let Some(picked) = pick(options, answer.trim(), default) {
                return Ok(Some(picked.to_string()));
            }
            println!("Please pick one of: {}", options.join(", "));
        }
    }

    /// Video/Audio toggle
    pub async fn mode(&mut self, default: MediaMode) -> std::io::Result<Option<MediaMode>> {
        let default = mode_label(default);
        let answer = self.choose("Download as", &["video", "audio"], default).await?;
        Ok(answer.map(|a| if a == "audio" { MediaMode::Audio } else { MediaMode::Video }))
    }

    /// Resolution selector for video mode
    pub async fn resolution(&mut self, default: &str) -> std::io::Result<Option<String>> {
        let labels: Vec<String> = Resolution::ALL.iter().map(ToString::to_string).collect();
        let options: Vec<&str> = labels.iter().map(String::as_str).collect();
        self.choose("Resolution", &options, default).await
    }

    /// Bitrate selector for audio mode
    pub async fn bitrate(&mut self, default: &str) -> std::io::Result<Option<String>> {
        self.choose("Audio quality", &AudioBitrate::OPTIONS, default).await
    }
}

fn mode_label(mode: MediaMode) -> &'static str {
    match mode {
        MediaMode::Video => "video",
        MediaMode::Audio => "audio",
    }
}

fn pick<'a>(options: &[&'a str], answer: &str, default: &'a str) -> Option<&'a str> {
    if answer.is_empty() {
        return Some(default);
    }
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).copied();
    }
    options.iter().find(|o| o.eq_ignore_ascii_case(answer)).copied()
}

fn ask(prompt: &str) -> std::io::Result<()> {
    print!("{}", prompt);
    std::io::stdout().flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &'static str) -> Prompter<&'static [u8]> {
        Prompter::new(input.as_bytes())
    }

    #[test]
    fn test_pick() {
        let options = ["144p", "360p", "720p"];
        assert_eq!(pick(&options, "", "360p"), Some("360p"));
        assert_eq!(pick(&options, "3", "360p"), Some("720p"));
        assert_eq!(pick(&options, "720P", "360p"), Some("720p"));
        assert_eq!(pick(&options, "0", "360p"), None);
        assert_eq!(pick(&options, "4", "360p"), None);
        assert_eq!(pick(&options, "4k", "360p"), None);
    }

    #[tokio::test]
    async fn test_url_prompt() {
        let mut p = prompter("  https://example.com/v  \n\n");
        assert_eq!(p.url().await.unwrap().as_deref(), Some("https://example.com/v"));
        assert_eq!(p.url().await.unwrap(), None);
        assert_eq!(p.url().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mode_then_selector() {
        let mut p = prompter("2\nnonsense\n256kbps\n");
        assert_eq!(p.mode(MediaMode::Video).await.unwrap(), Some(MediaMode::Audio));
        // invalid answer is asked again
        assert_eq!(p.bitrate("132kbps").await.unwrap().as_deref(), Some("256kbps"));
    }

    #[tokio::test]
    async fn test_empty_answer_uses_default() {
        let mut p = prompter("\n\n");
        assert_eq!(p.mode(MediaMode::Audio).await.unwrap(), Some(MediaMode::Audio));
        assert_eq!(p.resolution("480p").await.unwrap().as_deref(), Some("480p"));
    }

    #[tokio::test]
    async fn test_end_of_input() {
        let mut p = prompter("");
        assert_eq!(p.resolution("144p").await.unwrap(), None);
    }
}
