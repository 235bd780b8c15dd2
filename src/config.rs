use crate::reference::{CoverageLimit, InsurancePlan, Location, PlanCatalogs, Province, ReferenceData};
use crate::types::{LocationId, ProvinceId};

fn loc(id: u32, name: &str, risk_index: u8) -> Location {
    Location { id: LocationId(id), name: name.to_string(), risk_index }
}

fn province(id: u32, name: &str, locations: Vec<Location>) -> Province {
    Province { id: ProvinceId(id), name: name.to_string(), locations }
}

fn plan(
    value: &str,
    label: &str,
    description: &str,
    details: &[&str],
    base_price: u64,
    coverage_limit: u64,
) -> InsurancePlan {
    InsurancePlan {
        value: value.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        details: details.iter().map(|d| d.to_string()).collect(),
        base_price,
        coverage_limit: CoverageLimit::from(coverage_limit),
    }
}

impl ReferenceData {
    /// Built-in Argentine catalog: 10 provinces, 62 locations, 15 plans.
    pub fn canonical() -> Self {
        // ── Provinces ─────────────────────────────────────────────────────────
        // Location ids 11 and 12 repeat across Buenos Aires and Córdoba; lookups
        // go by name so this is harmless.
        let provinces = vec![
            province(1, "Buenos Aires", vec![
                loc(1, "CABA", 3),
                loc(2, "La Plata", 4),
                loc(3, "Mar del Plata", 3),
                loc(4, "Balcarce", 2),
                loc(5, "Tandil", 2),
                loc(6, "Bahía Blanca", 4),
                loc(7, "San Isidro", 2),
                loc(8, "Tigre", 3),
                loc(9, "Pilar", 3),
                loc(10, "Zona Norte (GBA)", 3),
                loc(11, "Zona Oeste (GBA)", 5),
                loc(12, "Zona Sur (GBA)", 6),
            ]),
            province(2, "Córdoba", vec![
                loc(11, "Córdoba Capital", 3),
                loc(12, "Villa María", 2),
                loc(13, "Río Cuarto", 2),
                loc(14, "Alta Gracia", 2),
                loc(15, "Carlos Paz", 2),
                loc(16, "Jesús María", 1),
                loc(17, "La Falda", 1),
                loc(18, "Mina Clavero", 1),
            ]),
            province(3, "Santa Fe", vec![
                loc(19, "Rosario", 5),
                loc(20, "Santa Fe Capital", 4),
                loc(21, "Rafaela", 2),
                loc(22, "Venado Tuerto", 2),
                loc(23, "San Lorenzo", 3),
                loc(24, "Reconquista", 3),
            ]),
            province(4, "Mendoza", vec![
                loc(25, "Mendoza Capital", 3),
                loc(26, "San Rafael", 2),
                loc(27, "Godoy Cruz", 3),
                loc(28, "Guaymallén", 3),
                loc(29, "Luján de Cuyo", 2),
                loc(30, "Maipú", 2),
            ]),
            province(5, "Tucumán", vec![
                loc(31, "San Miguel de Tucumán", 4),
                loc(32, "Yerba Buena", 2),
                loc(33, "Tafí Viejo", 3),
                loc(34, "Alderetes", 3),
                loc(35, "Banda del Río Salí", 4),
            ]),
            province(6, "Entre Ríos", vec![
                loc(36, "Paraná", 3),
                loc(37, "Concordia", 3),
                loc(38, "Gualeguaychú", 2),
                loc(39, "Concepción del Uruguay", 2),
                loc(40, "Victoria", 2),
            ]),
            province(7, "Salta", vec![
                loc(41, "Salta Capital", 4),
                loc(42, "San Ramón de la Nueva Orán", 5),
                loc(43, "Tartagal", 5),
                loc(44, "Cafayate", 2),
                loc(45, "Cerrillos", 3),
            ]),
            province(8, "Misiones", vec![
                loc(46, "Posadas", 4),
                loc(47, "Oberá", 3),
                loc(48, "Eldorado", 3),
                loc(49, "San Vicente", 4),
                loc(50, "Puerto Iguazú", 3),
            ]),
            province(9, "Chubut", vec![
                loc(51, "Comodoro Rivadavia", 4),
                loc(52, "Trelew", 3),
                loc(53, "Puerto Madryn", 2),
                loc(54, "Esquel", 2),
                loc(55, "Rawson", 2),
            ]),
            province(10, "Neuquén", vec![
                loc(56, "Neuquén Capital", 3),
                loc(57, "Cutral Có", 3),
                loc(58, "Plottier", 2),
                loc(59, "Centenario", 2),
                loc(60, "San Martín de los Andes", 1),
            ]),
        ];

        // ── Plans ─────────────────────────────────────────────────────────────
        // Prices in whole pesos per month. A coverage limit of 0 means unlimited.
        let home = vec![
            plan("basico", "Plan Básico", "Cobertura esencial para protección básica", &[
                "Incendio y explosión",
                "Robo con fuerza (hasta $50,000)",
                "Responsabilidad civil",
                "Daños por agua",
            ], 300, 50_000),
            plan("estandar", "Plan Estándar", "Protección balanceada para tu hogar", &[
                "Todo lo del Plan Básico",
                "Robo total (hasta $100,000)",
                "Vandalismo",
                "Cristales",
                "Electrodomésticos",
            ], 500, 100_000),
            plan("full", "Plan Full", "Cobertura completa con mayores límites", &[
                "Todo lo del Plan Estándar",
                "Contenido del hogar (hasta $200,000)",
                "Accidentes personales",
                "Asistencia en el hogar",
                "Realojamiento temporal",
            ], 800, 200_000),
            plan("vip", "Plan VIP", "Protección premium sin límites", &[
                "Todo lo del Plan Full",
                "Cobertura ilimitada de contenido",
                "Joyas y objetos de valor",
                "Responsabilidad civil ampliada",
                "Asistencia legal",
                "Cobertura mundial",
            ], 1200, 0),
        ];

        let auto = vec![
            plan("responsabilidad_civil", "Responsabilidad Civil", "Cobertura legal mínima obligatoria", &[
                "Daños a terceros hasta $5.000.000",
                "Gastos médicos a terceros",
                "Defensa legal",
                "Asistencia en viaje básica",
            ], 800, 5_000_000),
            plan("todo_riesgo_terceros", "Todo Riesgo con Franquicia", "Cobertura amplia con participación en siniestros", &[
                "Todo lo de Responsabilidad Civil",
                "Daños totales y parciales por accidente",
                "Robo total e incendio",
                "Cristales y cerraduras",
                "Granizo y fenómenos naturales",
                "Franquicia del 10% en daños propios",
            ], 1500, 0),
            plan("todo_riesgo_completo", "Todo Riesgo Completo", "Protección total sin franquicias", &[
                "Todo lo de Todo Riesgo con Franquicia",
                "Cero franquicia en todos los siniestros",
                "Auto de reemplazo por 10 días",
                "Asistencia premium en viaje",
                "Cobertura de accesorios",
                "Defensa penal",
            ], 2500, 0),
            plan("premium", "Plan Premium", "Protección exclusiva con beneficios adicionales", &[
                "Todo lo de Todo Riesgo Completo",
                "Cobertura internacional",
                "Asistencia VIP 24/7",
                "Chofer de reemplazo",
                "Traslado y estadía en hotel",
                "Reposición por pérdida total",
            ], 3500, 0),
        ];

        let motorcycle = vec![
            plan("responsabilidad_civil_moto", "Responsabilidad Civil", "Cobertura legal mínima obligatoria para motos", &[
                "Daños a terceros hasta $2.000.000",
                "Gastos médicos a terceros",
                "Defensa legal básica",
                "Asistencia en viaje",
            ], 400, 2_000_000),
            plan("todo_riesgo_moto", "Todo Riesgo Moto", "Protección completa para tu motovehículo", &[
                "Todo lo de Responsabilidad Civil",
                "Robo total e incendio",
                "Daños por accidente",
                "Accesorios originales",
                "Indemnización por incapacidad",
                "Asistencia mecánica",
            ], 800, 0),
            plan("premium_moto", "Plan Premium Moto", "Cobertura exclusiva para moteros", &[
                "Todo lo de Todo Riesgo Moto",
                "Casco y indumentaria",
                "Accesorios personalizados",
                "Asistencia VIP 24/7",
                "Grúa especializada",
                "Taller preferencial",
            ], 1200, 0),
        ];

        let life = vec![
            plan("basico_vida", "Plan Básico Vida", "Protección esencial para tu familia", &[
                "Muerte por cualquier causa",
                "Capital asegurado hasta $500.000",
                "Asistencia funeraria",
                "Beneficiarios ilimitados",
            ], 500, 500_000),
            plan("estandar_vida", "Plan Estándar Vida", "Protección balanceada con más coberturas", &[
                "Todo lo del Plan Básico",
                "Muerte accidental duplicada",
                "Invalidez total y permanente",
                "Enfermedades graves",
                "Capital hasta $1.000.000",
            ], 800, 1_000_000),
            plan("completo_vida", "Plan Completo Vida", "Protección integral para tranquilidad total", &[
                "Todo lo del Plan Estándar",
                "Cobertura mundial",
                "Asistencia médica internacional",
                "Repatriación",
                "Capital hasta $2.000.000",
            ], 1200, 2_000_000),
            plan("premium_vida", "Plan Premium Vida", "Protección exclusiva con máximo beneficio", &[
                "Todo lo del Plan Completo",
                "Capital ilimitado",
                "Renta vitalicia para beneficiarios",
                "Cobertura de enfermedades preexistentes",
                "Asistencia legal internacional",
            ], 2000, 0),
        ];

        ReferenceData { provinces, plans: PlanCatalogs { home, auto, motorcycle, life } }
    }
}
