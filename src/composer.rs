//! Post composer
//!
//! Builds the community-manager prompt from a business profile and a topic
//! idea, sends it to the text provider and parses the three-segment reply:
//!
//! ```text
//! COPY:
//! ...
//! ---
//! HASHTAGS:
//! ...
//! ---
//! IMAGEN_PROMPT:
//! ...
//! ```

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::PostError;
use crate::post::{require_non_empty, BusinessProfile, GeneratedPost};
use crate::text::TextGenerator;

/// Segment delimiter in the model reply
pub const DELIMITER: &str = "---";

/// Segment labels, in reply order
pub const COPY_LABEL: &str = "COPY:";
pub const HASHTAGS_LABEL: &str = "HASHTAGS:";
pub const IMAGE_PROMPT_LABEL: &str = "IMAGEN_PROMPT:";

// Leading label, case-insensitive. Bold forms `**COPY:**` and `**COPY**:` are
// accepted; a closing `**` is only consumed when the label opened with one.
static LABELS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [COPY_LABEL, HASHTAGS_LABEL, IMAGE_PROMPT_LABEL].map(|label| {
        let name = regex::escape(label.trim_end_matches(':'));
        Regex::new(&format!(
            r"(?i)^\s*(?:\*\*\s*{name}\s*(?::\s*\*\*|\*\*\s*:)|{name}\s*:)"
        ))
        .expect("label pattern is valid")
    })
});

/// Build the full instruction sent to the text provider.
///
/// Pure string interpolation: identical inputs give byte-identical prompts.
pub fn build_prompt(profile: &BusinessProfile, topic_idea: &str) -> String {
    format!(
        r#"**Rol:** Eres 'MyCm', un Community Manager experto en IA para PYMES de Argentina.
Tu objetivo es crear un posteo de Instagram listo para publicar.

**Datos del Negocio (Cliente):**
* Nombre: {name}
* Descripción y Tono: {description}
* Ubicación: {location}

**Tarea:**
Debes generar el contenido para un posteo de Instagram basado en la siguiente idea:
* Idea del Post: "{idea}"

**Reglas de Generación:**
1.  **Texto (Copy):** Escribe un texto (copy) que sea atractivo, cercano y en español de Argentina (usá "vos", "tenés", etc.).
2.  **Tono:** El tono debe ser coherente con la descripción del negocio.
3.  **CTA:** Incluye un Call-to-Action (Llamado a la Acción) claro y amigable.
4.  **Hashtags:** Genera una lista de 7 a 10 hashtags RELEVANTES (hiper-locales basados en {location}, producto, rubro).
5.  **Descripción de Imagen:** Genera un prompt para un generador de imágenes de IA (como Stable Diffusion). Debe ser conciso, descriptivo y en inglés. Debe estar optimizado para crear una imagen fotográfica y atractiva.
6.  No uses la secuencia "{delimiter}" dentro de ninguna sección.

**Formato de Respuesta (OBLIGATORIO):**
{copy_label}
[Aquí el texto del posteo. Debe tener saltos de línea y emojis.]
{delimiter}
{hashtags_label}
[#hashtag1, #hashtag2, #hashtag3, #hashtag4, #hashtag5, #hashtag6, #hashtag7]
{delimiter}
{image_label}
[Aquí el prompt de la imagen en inglés.]"#,
        name = profile.name.trim(),
        description = profile.description.trim(),
        location = profile.location.trim(),
        idea = topic_idea.trim(),
        delimiter = DELIMITER,
        copy_label = COPY_LABEL,
        hashtags_label = HASHTAGS_LABEL,
        image_label = IMAGE_PROMPT_LABEL,
    )
}

/// Split a raw reply into copy, hashtags and image prompt.
///
/// Exactly two delimiters are required; anything else is a format error that
/// carries the raw reply.
pub fn parse_reply(raw: &str) -> Result<GeneratedPost, PostError> {
    let segments: Vec<&str> = raw.split(DELIMITER).collect();

    let [copy, hashtags, image_prompt] = segments.as_slice() else {
        return Err(PostError::Format {
            raw: raw.to_string(),
        });
    };

    Ok(GeneratedPost {
        copy: strip_label(copy, 0),
        hashtags: strip_label(hashtags, 1),
        image_prompt: strip_label(image_prompt, 2),
    })
}

fn strip_label(segment: &str, index: usize) -> String {
    LABELS[index].replace(segment, "").trim().to_string()
}

/// Turns a profile and an idea into a `GeneratedPost` with one provider call
#[derive(Debug, Clone)]
pub struct PostComposer {
    text: Arc<dyn TextGenerator>,
}

impl PostComposer {
    /// Create a composer over a text provider
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self { text }
    }

    /// The underlying text provider
    pub fn provider(&self) -> &dyn TextGenerator {
        self.text.as_ref()
    }

    /// Compose a post. No retries.
    pub async fn compose(
        &self,
        profile: &BusinessProfile,
        topic_idea: &str,
    ) -> Result<GeneratedPost, PostError> {
        self.compose_reply(profile, topic_idea)
            .await
            .map(|(post, _)| post)
    }

    /// Like `compose`, but also returns the provider's raw reply
    pub async fn compose_reply(
        &self,
        profile: &BusinessProfile,
        topic_idea: &str,
    ) -> Result<(GeneratedPost, String), PostError> {
        profile.validate()?;
        require_non_empty("topic_idea", topic_idea)?;

        info!(
            "Composing post for '{}' with {} ({})",
            profile.name,
            self.text.provider_name(),
            self.text.model_name()
        );

        let prompt = build_prompt(profile, topic_idea);
        let raw = self.text.generate(&prompt).await?;
        debug!("Raw reply: {}", raw);

        let post = parse_reply(&raw).inspect_err(|_| {
            warn!(
                "Reply from {} did not have three segments",
                self.text.provider_name()
            )
        })?;

        Ok((post, raw))
    }
}
