//! The achievement catalog: 70 fixed definitions in evaluation order.
//!
//! Texts are product copy and stay in Spanish. Ids are persisted in unlock
//! records and must never change.

use crate::achievement::{
  Achievement,
  Category::{self, *},
  Condition::{self, *},
  Difficulty::{self, *},
  Metric::*,
  Rarity::{self, *},
};

/// Granted on first login; the only manual, non-revocable entry.
pub const ENTRY_ACHIEVEMENT: &str = "quien_eres";

/// Unlocked once every other entry is unlocked.
pub const META_ACHIEVEMENT: &str = "autismo_nivel_serio";

#[allow(clippy::too_many_arguments)]
const fn entry(
  id: &'static str,
  title: &'static str,
  description: &'static str,
  category: Category,
  difficulty: Difficulty,
  rarity: Rarity,
  icon: &'static str,
  condition: Condition,
) -> Achievement {
  Achievement { id, title, description, category, difficulty, rarity, icon, condition }
}

/// Look up a definition by id.
pub fn find(id: &str) -> Option<&'static Achievement> {
  CATALOG.iter().find(|a| a.id == id)
}

pub static CATALOG: [Achievement; 70] = [
  entry(
    "quien_eres",
    "¿Quién eres?",
    "Entraste y elegiste tu identidad. No hay vuelta atrás.",
    General, Easy, Common, "user",
    Manual,
  ),
  entry(
    "uno_completado",
    "Uno",
    "Completaste un juego. Uno. En toda tu vida.",
    General, Easy, Common, "trophy",
    AtLeast(Completed, 1),
  ),
  entry(
    "cinco_completados",
    "Cinco",
    "Cinco juegos terminados. Casi te da para una frase en el currículum.",
    General, Easy, Common, "trophy",
    AtLeast(Completed, 5),
  ),
  entry(
    "diez_completados",
    "Diez",
    "Diez completados. Ni tú te lo crees.",
    General, Medium, Uncommon, "trophy",
    AtLeast(Completed, 10),
  ),
  entry(
    "veinticinco_completados",
    "Veinticinco",
    "Veinticinco juegos. Y sigues sin tener vida social.",
    General, Hard, Rare, "trophy",
    AtLeast(Completed, 25),
  ),
  entry(
    "cincuenta_completados",
    "Cincuenta",
    "Cincuenta. La mitad de tu tiempo en la Tierra ha sido esto.",
    General, Insane, Rare, "trophy",
    AtLeast(Completed, 50),
  ),
  entry(
    "lista_infinita",
    "Lista infinita",
    "Diez juegos pendientes. Los jugarás. Seguro. Mentira.",
    General, Easy, Common, "list",
    AtLeast(Pending, 10),
  ),
  entry(
    "coleccionista",
    "Coleccionista",
    "Veinte en la lista. Algún día. O nunca.",
    General, Medium, Uncommon, "archive",
    AtLeast(Pending, 20),
  ),
  entry(
    "mes_tres",
    "Mes productivo",
    "Tres juegos este mes. La barra estaba por el suelo.",
    Monthly, Medium, Uncommon, "calendar",
    AtLeast(CompletedThisMonth, 3),
  ),
  entry(
    "año_diez",
    "Año glorioso",
    "Diez en un año. Casi como una persona funcional. Casi.",
    Yearly, Hard, Rare, "calendar",
    AtLeast(CompletedThisYear, 10),
  ),
  entry(
    "monogenero",
    "Monogénero",
    "Cinco o más del mismo género. Qué variedad.",
    General, Medium, Uncommon, "tag",
    SingleGenreAtLeast(5),
  ),
  entry(
    "tres_pendientes",
    "Tres en la lista",
    "Tres pendientes. Ya es un compromiso que no cumplirás.",
    General, Easy, Common, "list",
    AtLeast(Pending, 3),
  ),
  entry(
    "primera_abandonado",
    "El primero que abandonas",
    "Abandonaste uno. Habrá muchos más.",
    General, Easy, Common, "circle-slash",
    AtLeast(Abandoned, 1),
  ),
  entry(
    "mes_uno",
    "Uno este mes",
    "Completaste uno este mes. Algo es algo. O no.",
    Monthly, Easy, Common, "calendar",
    AtLeast(CompletedThisMonth, 1),
  ),
  entry(
    "año_uno",
    "Uno este año",
    "Uno en todo el año. Productividad nivel dios.",
    Yearly, Easy, Common, "calendar",
    AtLeast(CompletedThisYear, 1),
  ),
  entry(
    "veinte_completados",
    "Veinte",
    "Veinte juegos. Tu mayor logro en la vida.",
    General, Medium, Uncommon, "trophy",
    AtLeast(Completed, 20),
  ),
  entry(
    "treinta_pendientes",
    "Treinta pendientes",
    "Treinta. No es una lista. Es una condena.",
    General, Hard, Rare, "archive",
    AtLeast(Pending, 30),
  ),
  entry(
    "ni_uno_terminado",
    "Ni uno",
    "Cinco jugados y ninguno terminado. Coherencia.",
    Abandonment, Easy, Uncommon, "circle-slash",
    PlayedNoneCompleted(5),
  ),
  entry(
    "dejaste_cinco",
    "Dejaste cinco atrás",
    "Cinco abandonados. Tu biblioteca te juzga.",
    Abandonment, Easy, Common, "circle-slash",
    AtLeast(Abandoned, 5),
  ),
  entry(
    "dejaste_diez",
    "Dejaste diez atrás",
    "Diez. Ya ni te acuerdas de sus nombres.",
    Abandonment, Medium, Uncommon, "circle-slash",
    AtLeast(Abandoned, 10),
  ),
  entry(
    "dejaste_veinticinco",
    "Veinticinco abandonos",
    "Veinticinco juegos a la basura. Eres un desastre.",
    Abandonment, Hard, Rare, "circle-slash",
    AtLeast(Abandoned, 25),
  ),
  entry(
    "mas_abandonos_que_completados",
    "Más abandonos que logros",
    "Has dejado más juegos a medias de los que has terminado. Diagnóstico claro.",
    Abandonment, Medium, Uncommon, "circle-slash",
    MoreAbandonedThanCompleted,
  ),
  entry(
    "abandono_precoz",
    "Abandono precoz",
    "Abandonaste uno. El primero de una larga lista de decepciones.",
    Abandonment, Easy, Common, "circle-slash",
    AtLeast(Abandoned, 1),
  ),
  entry(
    "quince_abandonados",
    "Quince abandonados",
    "Quince. No terminas ni los juegos. Imagina los proyectos de vida.",
    Abandonment, Medium, Uncommon, "circle-slash",
    AtLeast(Abandoned, 15),
  ),
  entry(
    "terror_uno",
    "Un susto",
    "Jugaste un juego de terror. O lo dejaste a los cinco minutos.",
    Terror, Easy, Common, "ghost",
    AtLeast(Genre("horror"), 1),
  ),
  entry(
    "terror_cinco",
    "Cinco terrores",
    "Cinco de terror. O eres valiente o tienes un problema.",
    Terror, Medium, Uncommon, "ghost",
    AtLeast(Genre("horror"), 5),
  ),
  entry(
    "terror_diez",
    "Diez terrores",
    "Diez. El miedo ya es tu estado natural.",
    Terror, Hard, Rare, "ghost",
    AtLeast(Genre("horror"), 10),
  ),
  entry(
    "souls_uno",
    "Un souls",
    "Un soulslike. Moriste. Mucho.",
    Soulslike, Easy, Common, "sword",
    AtLeast(Genre("souls"), 1),
  ),
  entry(
    "souls_cinco",
    "Cinco souls",
    "Cinco. El masoquismo como estilo de vida.",
    Soulslike, Medium, Uncommon, "sword",
    AtLeast(Genre("souls"), 5),
  ),
  entry(
    "souls_diez",
    "Diez souls",
    "Diez. Ya no sientes dolor. O solo juegas a lo mismo.",
    Soulslike, Hard, Rare, "sword",
    AtLeast(Genre("souls"), 10),
  ),
  entry(
    "rpg_uno",
    "Un RPG",
    "Un RPG. Cien horas de tu vida. O dos y lo abandonaste.",
    Rpg, Easy, Common, "sword",
    AtLeast(Genre("rpg"), 1),
  ),
  entry(
    "rpg_cinco",
    "Cinco RPGs",
    "Cinco. Las matemáticas de daño te emocionan.",
    Rpg, Medium, Uncommon, "sword",
    AtLeast(Genre("rpg"), 5),
  ),
  entry(
    "rpg_diez",
    "Diez RPGs",
    "Diez. Tu vida social es un número de estadística.",
    Rpg, Hard, Rare, "sword",
    AtLeast(Genre("rpg"), 10),
  ),
  entry(
    "hack_uno",
    "Un hack and slash",
    "Uno. Botón ataque. Repetir hasta el final.",
    HackAndSlash, Easy, Common, "sword",
    AtLeast(Genre("action"), 1),
  ),
  entry(
    "hack_cinco",
    "Cinco de acción",
    "Cinco. Tu reflejo es solo para esquivar en pantalla.",
    HackAndSlash, Medium, Uncommon, "sword",
    AtLeast(Genre("action"), 5),
  ),
  entry(
    "hack_diez",
    "Diez de acción",
    "Diez. Crees que tienes reflejos. No.",
    HackAndSlash, Hard, Rare, "sword",
    AtLeast(Genre("action"), 10),
  ),
  entry(
    "shooter_uno",
    "Un shooter",
    "Un shooter. Apuntar y disparar. Tu máximo talento.",
    Shooters, Easy, Common, "target",
    AtLeast(Genre("shooter"), 1),
  ),
  entry(
    "shooter_cinco",
    "Cinco shooters",
    "Cinco. El headshot es tu única meta en la vida.",
    Shooters, Medium, Uncommon, "target",
    AtLeast(Genre("shooter"), 5),
  ),
  entry(
    "shooter_diez",
    "Diez shooters",
    "Diez. Si fuera la vida real ya estarías en la cárcel.",
    Shooters, Hard, Rare, "target",
    AtLeast(Genre("shooter"), 10),
  ),
  entry(
    "strategy_uno",
    "Una estrategia",
    "Uno de estrategia. Planificar es lo único que haces bien.",
    Strategy, Easy, Common, "building2",
    AtLeast(Genre("strateg"), 1),
  ),
  entry(
    "strategy_cinco",
    "Cinco de estrategia",
    "Cinco. El mundo real te da miedo. Los mapas no.",
    Strategy, Medium, Uncommon, "building2",
    AtLeast(Genre("strateg"), 5),
  ),
  entry(
    "strategy_diez",
    "Diez de estrategia",
    "Diez. Napoleón sin ejército.",
    Strategy, Hard, Rare, "building2",
    AtLeast(Genre("strateg"), 10),
  ),
  entry(
    "indie_uno",
    "Un indie",
    "Un indie. Te crees alternativo.",
    Indies, Easy, Common, "leaf",
    AtLeast(Genre("indie"), 1),
  ),
  entry(
    "indie_cinco",
    "Cinco indies",
    "Disculpa eres Alex el capo",
    Indies, Medium, Uncommon, "leaf",
    AtLeast(Genre("indie"), 5),
  ),
  entry(
    "indie_diez",
    "Diez indies",
    "Diez. Tu personalidad es 'me gustan los indies'.",
    Indies, Hard, Rare, "leaf",
    AtLeast(Genre("indie"), 10),
  ),
  entry(
    "metroid_uno",
    "Un metroidvania",
    "Uno. Perdido por el mapa como en sus mentiras.",
    Metroidvania, Easy, Common, "map",
    AtLeast(Genre("metroidvania"), 1),
  ),
  entry(
    "metroid_cinco",
    "Cinco metroidvanias",
    "Principio de Autismo",
    Metroidvania, Medium, Uncommon, "map",
    AtLeast(Genre("metroidvania"), 5),
  ),
  entry(
    "metroid_diez",
    "Diez metroidvanias",
    "Diez. Ya no te pierdes. Solo en la realidad.",
    Metroidvania, Hard, Rare, "map",
    AtLeast(Genre("metroidvania"), 10),
  ),
  entry(
    "solo_entraste",
    "Solo entraste",
    "Solo tienes el logro de entrar. El resto te supera.",
    Hidden, Easy, Common, "lock",
    OnlyOneUnlocked,
  ),
  entry(
    "nada_desbloqueado",
    "Cero",
    "No has desbloqueado nada. Ni siquiera te has molestado.",
    Hidden, Insane, Rare, "lock",
    Never,
  ),
  entry(
    "todo_pendiente",
    "Solo pendientes",
    "Tienes pendientes pero no has completado ninguno. La procrastinación hecha usuario.",
    Hidden, Medium, Uncommon, "lock",
    PendingNoneCompleted(5),
  ),
  entry(
    "adicto_mensual",
    "Adicto mensual",
    "Cinco o más completados este mes. ¿Saliste de casa?",
    Hidden, Hard, Rare, "lock",
    AtLeast(CompletedThisMonth, 5),
  ),
  entry(
    "leyenda",
    "Leyenda",
    "Cien juegos completados. Nadie preguntará cómo. Nadie querrá saberlo.",
    Hidden, Insane, Rare, "lock",
    AtLeast(Completed, 100),
  ),
  entry(
    "sin_vida",
    "Sin vida",
    "Tantos juegos que ya no recuerdas cuál era la vida real.",
    Hidden, Insane, Rare, "lock",
    AtLeast(Played, 75),
  ),
  entry(
    "adventure_uno",
    "Una aventura",
    "Un juego de aventuras. La tuya es no salir de casa.",
    General, Easy, Common, "map",
    AtLeast(Genre("adventure"), 1),
  ),
  entry(
    "adventure_cinco",
    "Cinco aventuras",
    "Cinco. Las únicas aventuras que vivirás.",
    General, Medium, Uncommon, "map",
    AtLeast(Genre("adventure"), 5),
  ),
  entry(
    "cinco_pendientes",
    "Cinco en la lista",
    "Cinco pendientes. Promesas que no cumplirás.",
    General, Easy, Common, "list",
    AtLeast(Pending, 5),
  ),
  entry(
    "quince_completados",
    "Quince",
    "Quince juegos. Tu récord personal. Patético.",
    General, Medium, Uncommon, "trophy",
    AtLeast(Completed, 15),
  ),
  entry(
    "mes_cinco",
    "Cinco este mes",
    "Cinco en un mes. ¿Tienes algo más que hacer?",
    Monthly, Hard, Rare, "calendar",
    AtLeast(CompletedThisMonth, 5),
  ),
  entry(
    "año_veinte",
    "Veinte en un año",
    "Veinte en un año. La productividad de un parásito.",
    Yearly, Insane, Rare, "calendar",
    AtLeast(CompletedThisYear, 20),
  ),
  entry(
    "terror_quince",
    "Quince terrores",
    "Quince de terror. El miedo es tu zona de confort.",
    Terror, Insane, Rare, "ghost",
    AtLeast(Genre("horror"), 15),
  ),
  entry(
    "rpg_quince",
    "Quince RPGs",
    "Quince. Los números te definen. Literalmente.",
    Rpg, Insane, Rare, "sword",
    AtLeast(Genre("rpg"), 15),
  ),
  entry(
    "indie_quince",
    "Quince indies",
    "Quince. Tu identidad es 'jugador de indies'.",
    Indies, Insane, Rare, "leaf",
    AtLeast(Genre("indie"), 15),
  ),
  entry(
    "shooter_quince",
    "Quince shooters",
    "Quince. El único headshot que importa es el tuyo en la realidad.",
    Shooters, Insane, Rare, "target",
    AtLeast(Genre("shooter"), 15),
  ),
  entry(
    "strategy_quince",
    "Quince de estrategia",
    "Quince. Estratega en pantalla. Inútil en la vida.",
    Strategy, Insane, Rare, "building2",
    AtLeast(Genre("strateg"), 15),
  ),
  entry(
    "cuarenta_abandonados",
    "Cuarenta abandonados",
    "Cuarenta. Eres un cementerio de juegos a medias.",
    Abandonment, Insane, Rare, "circle-slash",
    AtLeast(Abandoned, 40),
  ),
  entry(
    "ochenta_completados",
    "Ochenta",
    "Ochenta juegos. Tu obituario dirá 'jugó mucho'.",
    Hidden, Insane, Rare, "lock",
    AtLeast(Completed, 80),
  ),
  entry(
    "todo_generos",
    "Un poco de todo",
    "Jugaste al menos un juego de cinco géneros distintos. Qué explorador.",
    Hidden, Hard, Uncommon, "lock",
    DistinctGenresAtLeast(5),
  ),
  entry(
    "metroid_quince",
    "Quince metroidvanias",
    "Quince. El mapa es tu única guía. En la vida no tienes ninguna.",
    Metroidvania, Insane, Rare, "map",
    AtLeast(Genre("metroidvania"), 15),
  ),
  entry(
    "autismo_nivel_serio",
    "Autismo nivel serio",
    "De haberlas completado todas. Todas.",
    Hidden, Insane, Rare, "lock",
    AllOthersUnlocked,
  ),
];

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn ids_are_unique() {
    let ids: HashSet<&str> = CATALOG.iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), CATALOG.len());
  }

  #[test]
  fn exactly_one_manual_entry() {
    let manual: Vec<_> = CATALOG.iter().filter(|a| !a.is_revocable()).collect();
    assert_eq!(manual.len(), 1);
    assert_eq!(manual[0].id, ENTRY_ACHIEVEMENT);
  }

  #[test]
  fn exactly_one_meta_entry() {
    let meta: Vec<_> = CATALOG.iter().filter(|a| a.is_meta()).collect();
    assert_eq!(meta.len(), 1);
    assert_eq!(meta[0].id, META_ACHIEVEMENT);
  }

  #[test]
  fn find_by_id() {
    assert_eq!(find("tres_pendientes").map(|a| a.title), Some("Tres en la lista"));
    assert!(find("no_existe").is_none());
  }

  #[test]
  fn progress_only_for_thresholds() {
    let with_progress = CATALOG.iter().filter(|a| a.has_progress()).count();
    assert_eq!(with_progress, 61);
    for id in [ENTRY_ACHIEVEMENT, META_ACHIEVEMENT, "monogenero", "todo_generos", "ni_uno_terminado"] {
      assert!(!find(id).unwrap().has_progress(), "{id} should not report progress");
    }
  }

  #[test]
  fn genre_tokens_are_lowercase() {
    for a in &CATALOG {
      if let AtLeast(Genre(token), _) = a.condition {
        assert_eq!(token, token.to_lowercase(), "{}", a.id);
      }
    }
  }
}
