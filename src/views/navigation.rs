use crate::models::Product;

/// Page currently shown.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Home,
    ProductDetail(Product),
    Admin,
}

/// User intents that move between pages.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    LogoClicked,
    ProductClicked(Product),
    AdminClicked,
    Back,
    AdminLoggedOut,
}

/// Image carousel position on the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageCursor {
    index: usize,
    len: usize,
}

impl ImageCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// Jump to `index`; out-of-range requests are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.len {
            self.index = index;
            true
        } else {
            false
        }
    }
}

/// Which page is shown and which product is selected. Every event is
/// accepted from every state.
#[derive(Debug, Clone)]
pub struct Navigator {
    state: ViewState,
    cursor: ImageCursor,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            state: ViewState::Home,
            cursor: ImageCursor::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn selected(&self) -> Option<&Product> {
        match &self.state {
            ViewState::ProductDetail(product) => Some(product),
            _ => None,
        }
    }

    pub fn cursor(&self) -> &ImageCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut ImageCursor {
        &mut self.cursor
    }

    /// URL of the image under the cursor on the detail page.
    pub fn current_image(&self) -> Option<&str> {
        self.selected()
            .and_then(|p| p.images.get(self.cursor.index()))
            .map(String::as_str)
    }

    pub fn dispatch(&mut self, event: NavEvent) -> &ViewState {
        self.state = match event {
            NavEvent::ProductClicked(product) => {
                self.cursor = ImageCursor::new(product.images.len());
                ViewState::ProductDetail(product)
            }
            NavEvent::AdminClicked => ViewState::Admin,
            NavEvent::LogoClicked | NavEvent::Back | NavEvent::AdminLoggedOut => ViewState::Home,
        };
        if !matches!(self.state, ViewState::ProductDetail(_)) {
            self.cursor = ImageCursor::default();
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(images: usize) -> Product {
        Product {
            id: 1,
            title: "Amóre Chili".to_string(),
            description: None,
            price: 10500.0,
            images: (0..images).map(|i| format!("https://cdn/{}.jpg", i)).collect(),
            shopier_url: "https://www.shopier.com/1".to_string(),
            dimensions: None,
            materials: None,
            stock: 1,
            is_featured: false,
            display_order: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_starts_at_home() {
        assert_eq!(Navigator::new().state(), &ViewState::Home);
    }

    #[test]
    fn test_transitions_are_total() {
        let events = vec![
            NavEvent::LogoClicked,
            NavEvent::ProductClicked(product(2)),
            NavEvent::AdminClicked,
            NavEvent::Back,
            NavEvent::AdminLoggedOut,
        ];
        let starts = vec![
            ViewState::Home,
            ViewState::ProductDetail(product(1)),
            ViewState::Admin,
        ];
        for start in &starts {
            for event in &events {
                let mut nav = Navigator::new();
                nav.state = start.clone();
                let next = nav.dispatch(event.clone()).clone();
                match event {
                    NavEvent::ProductClicked(p) => {
                        assert_eq!(next, ViewState::ProductDetail(p.clone()))
                    }
                    NavEvent::AdminClicked => assert_eq!(next, ViewState::Admin),
                    _ => assert_eq!(next, ViewState::Home),
                }
            }
        }
    }

    #[test]
    fn test_cursor_wraps_both_ways() {
        let mut nav = Navigator::new();
        nav.dispatch(NavEvent::ProductClicked(product(3)));
        assert_eq!(nav.current_image(), Some("https://cdn/0.jpg"));

        nav.cursor_mut().prev();
        assert_eq!(nav.cursor().index(), 2);
        nav.cursor_mut().next();
        assert_eq!(nav.cursor().index(), 0);

        assert!(nav.cursor_mut().select(1));
        assert!(!nav.cursor_mut().select(3));
        assert_eq!(nav.current_image(), Some("https://cdn/1.jpg"));
    }

    #[test]
    fn test_leaving_detail_resets_cursor() {
        let mut nav = Navigator::new();
        nav.dispatch(NavEvent::ProductClicked(product(3)));
        nav.cursor_mut().next();
        nav.dispatch(NavEvent::Back);

        assert!(nav.selected().is_none());
        assert!(nav.cursor().is_empty());
        assert_eq!(nav.current_image(), None);
    }

    #[test]
    fn test_cursor_without_images_is_inert() {
        let mut cursor = ImageCursor::new(0);
        cursor.next();
        cursor.prev();
        assert_eq!(cursor.index(), 0);
    }
}
