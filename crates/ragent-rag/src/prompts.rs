/// Contextualization prompt; `{history}` and `{query}` are substituted
pub const CONTEXTUALIZE_PROMPT: &str = r#"Dado el historial de conversación y las últimas consultas del usuario, reescribí la consulta para que sea AUTOCONTENIDA (que se entienda sin necesidad del historial).

REGLAS:
1. Si la consulta hace referencia a algo mencionado antes ("la receta", "eso", "lo anterior", "el tema", etc.), reemplazá la referencia por el término concreto del historial.
2. Si la consulta ya es autocontenida, devolvela sin cambios.
3. Respondé ÚNICAMENTE con la consulta reformulada, nada más.

EJEMPLOS:
- Historial: ["quiero hacer tacos"] → Consulta: "dime la receta" → "dime la receta de tacos"
- Historial: ["que es un rag?", "RAG es..."] → Consulta: "como lo implemento?" → "como implemento un rag?"
- Historial: ["me gusta el chocolate"] → Consulta: "que postres hay?" → "que postres hay?" (ya es autocontenida)

HISTORIAL RECIENTE:
{history}

CONSULTA DEL USUARIO:
{query}

CONSULTA REFORMULADA:"#;

/// Keyword extraction prompt; `{query}` is substituted
pub const KEYWORDS_PROMPT: &str = r#"Eres un experto en búsqueda semántica. Tu tarea es extraer las palabras clave más relevantes de una consulta del usuario para buscar en una base de datos de documentos.

INSTRUCCIONES:
1. Extrae SOLO los conceptos y temas principales de la consulta
2. Ignora palabras conversacionales como "podrías", "dame", "quiero", "necesito", "por favor", "como", "que", "donde", etc.
3. Incluye sinónimos relevantes y términos en inglés si el tema es técnico
4. Responde ÚNICAMENTE con las keywords separadas por espacios
5. Máximo 10 palabras
6. Si la consulta es muy corta (1-3 palabras), SIEMPRE expande con términos relacionados y sinónimos
7. Mantené siempre el término original del tema principal en las keywords

EJEMPLOS:
- "podrias darme un paso a paso para hacer un taco?" → "tacos preparación receta ingredientes pasos cocina"
- "cuéntame sobre la historia de los tacos" → "tacos historia origen tradición méxico"
- "tacos" → "tacos comida mexicana recetas"
- "que es un rag?" → "rag retrieval augmented generation definición concepto"

CONSULTA DEL USUARIO:
{query}

KEYWORDS DE BÚSQUEDA:"#;

/// Label used for the memory line of the contextualization history
pub const MEMORY_HISTORY_LABEL: &str = "[Memoria del usuario]";
