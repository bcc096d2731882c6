//! Render output
//!
//! Components render into a small element tree that host renderers walk.
//! Attribute and style order is preserved so snapshot output stays stable.

use indexmap::IndexMap;

/// A rendered element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderNode {
    pub tag: &'static str,
    pub id: Option<String>,
    pub attrs: IndexMap<String, String>,
    pub style: IndexMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set `name` to `"true"`/`"false"`
    pub fn flag(self, name: impl Into<String>, value: bool) -> Self {
        self.attr(name, if value { "true" } else { "false" })
    }

    /// Set an attribute only when `value` is present
    pub fn attr_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    /// Pixel-valued style property
    pub fn px(self, property: impl Into<String>, value: f32) -> Self {
        self.style(property, format!("{}px", value))
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: RenderNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RenderNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    /// Depth-first search by id
    pub fn find_by_id(&self, id: &str) -> Option<&RenderNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }

    /// All descendants (including self) with the given `role`
    pub fn find_by_role(&self, role: &str) -> Vec<&RenderNode> {
        let mut found = Vec::new();
        self.collect_role(role, &mut found);
        found
    }

    fn collect_role<'a>(&'a self, role: &str, found: &mut Vec<&'a RenderNode>) {
        if self.get_attr("role") == Some(role) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_role(role, found);
        }
    }
}
