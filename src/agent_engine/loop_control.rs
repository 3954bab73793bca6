// Click-repeat guard. The loop normally ends when the currency button
// disappears; the cap only matters when the label keeps re-rendering it.

pub struct ClickLoop {
    max_clicks: u32,
    clicks: u32,
}

impl ClickLoop {
    pub fn new(max_clicks: u32) -> Self {
        Self {
            max_clicks: max_clicks.max(1),
            clicks: 0,
        }
    }

    pub fn record_click(&mut self) {
        self.clicks += 1;
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn cap_reached(&self) -> bool {
        self.clicks >= self.max_clicks
    }
}
