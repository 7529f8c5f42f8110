use termimad::{
    Alignment, MadSkin,
    crossterm::style::{Attribute, Color},
};

const fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: (hex >> 16) as u8,
        g: (hex >> 8) as u8,
        b: hex as u8,
    }
}

/// One Dark colors for the event card. The card is a title, a bullet list
/// and the odd `_not found_`, so only those elements are styled.
pub struct OneDark;

impl OneDark {
    pub const FG: Color = rgb(0xABB2BF);
    pub const YELLOW: Color = rgb(0xE5C07B);
    pub const GREEN: Color = rgb(0x98C379);
    pub const CYAN: Color = rgb(0x56B6C2);
    pub const COMMENT: Color = rgb(0x5C6370);

    pub fn event_card_skin() -> MadSkin {
        let mut skin = MadSkin::default();

        skin.paragraph.set_fg(Self::FG);
        skin.italic.set_fg(Self::COMMENT);
        skin.bold.set_fg(Self::CYAN);
        skin.bullet.set_fg(Self::GREEN);

        let title = &mut skin.headers[0];
        title.set_fg(Self::YELLOW);
        title.add_attr(Attribute::Bold);
        title.align = Alignment::Left;

        skin
    }
}
