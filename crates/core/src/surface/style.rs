use crate::document::style_block_key;

use super::RenderContext;

/// Keeps each page's style present in the rendering context.
///
/// `ensure` is idempotent and safe to call on every page selection and
/// every context reinitialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleReapplier;

impl StyleReapplier {
    /// Make the block keyed by `page_id` equal `css`. Returns whether the
    /// context had to be written.
    pub fn ensure(&self, ctx: &dyn RenderContext, page_id: &str, css: &str) -> bool {
        let key = style_block_key(page_id);
        if ctx.style_block(&key).as_deref() == Some(css) {
            return false;
        }
        ctx.upsert_style_block(&key, css);
        tracing::debug!(page_id, key = %key, bytes = css.len(), "Reapplied page style");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessRenderContext;

    #[test]
    fn ensure_is_idempotent() {
        let ctx = HeadlessRenderContext::default();
        let reapplier = StyleReapplier;

        assert!(reapplier.ensure(&ctx, "p1", "h1{color:red}"));
        assert!(!reapplier.ensure(&ctx, "p1", "h1{color:red}"));
        assert_eq!(
            ctx.style_block("page-style-p1").as_deref(),
            Some("h1{color:red}")
        );

        assert!(reapplier.ensure(&ctx, "p1", "h1{color:blue}"));
        assert_eq!(ctx.block_count(), 1);
    }

    #[test]
    fn ensure_restores_after_reset() {
        let ctx = HeadlessRenderContext::default();
        let reapplier = StyleReapplier;

        reapplier.ensure(&ctx, "p1", "a{}");
        ctx.reset();
        assert_eq!(ctx.style_block("page-style-p1"), None);

        assert!(reapplier.ensure(&ctx, "p1", "a{}"));
        assert_eq!(ctx.style_block("page-style-p1").as_deref(), Some("a{}"));
    }
}
