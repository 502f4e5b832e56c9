/// Field names the model is told to return; the browser client reads the same keys.
pub const ANALYSIS_FIELDS: [&str; 5] = [
    "platoDescripcion",
    "ingredientes",
    "calorias",
    "proteinas",
    "grasas",
];

const FOOD_ANALYSIS_PROMPT: &str = "Analiza la imagen de este plato de comida e identifica sus ingredientes principales.\n\
Después estima su información nutricional general: calorías totales aproximadas, gramos de proteína y gramos de grasa.\n\
Responde estrictamente con un único objeto JSON que tenga exactamente estas claves: \
\"platoDescripcion\" (string), \"ingredientes\" (array de strings), \"calorias\" (string o number), \
\"proteinas\" (string o number), \"grasas\" (string o number).\n\
No añadas texto explicativo, introducciones, conclusiones ni notas, y no uses formato markdown \
(por ejemplo ```json). La respuesta debe ser solamente el objeto JSON.";

/// Fixed instruction sent alongside every photo.
pub fn food_analysis_prompt() -> &'static str {
    FOOD_ANALYSIS_PROMPT
}
