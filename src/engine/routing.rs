// ==========================================
// MES 数据仿真系统 - 产品工艺路由查找表
// ==========================================
// 职责: 纯查找表与分类函数，无 I/O、无随机性
// 设计要点: 关键词匹配规则全部收敛为显式常量表，
//           而不是散落在生成逻辑里的子串判断，便于独立测试
// ==========================================

use crate::domain::types::ProductLevel;

// ==========================================
// 产品层级表 (BOM 层级划分)
// ==========================================

pub const RAW_MATERIALS: &[&str] = &[
    "Aluminum Tubing",
    "Steel Bolts",
    "Rubber Grips",
    "Brake Cables",
    "Gear Shifters",
    "Ball Bearings",
    "Wheel Spokes",
    "Tire Rubber",
    "Chain Links",
    "Pedal Assemblies",
    "Lithium-ion Cells",
    "Control Circuits",
    "Seat Padding",
    "Handlebar Tubing",
];

pub const COMPONENTS: &[&str] = &[
    "Wheel",
    "Wheels",
    "Tires",
    "Brake_Lever",
    "Gear_Lever",
    "Front_Derailleur",
    "Rear_Derailleur",
    "Chain",
    "Bottom_Bracket",
    "Crank",
    "Bolt",
    "Washer",
];

pub const SUBASSEMBLIES: &[&str] = &[
    "Frame",
    "Battery",
    "Motor",
    "Control_Unit",
    "Motor_Assembly",
    "Drive_Train",
    "Cassette",
    "Brakes",
    "Forks",
    "Seat",
    "Handlebar",
];

pub const FINISHED_PRODUCTS: &[&str] = &["eBike T101", "eBike T200", "eBike C150", "eBike M300"];

/// 按名称判定产品层级（未收录的名称默认视为零部件）
pub fn product_level(name: &str) -> ProductLevel {
    if RAW_MATERIALS.contains(&name) {
        ProductLevel::RawMaterial
    } else if SUBASSEMBLIES.contains(&name) {
        ProductLevel::Subassembly
    } else if FINISHED_PRODUCTS.contains(&name) {
        ProductLevel::FinishedProduct
    } else {
        ProductLevel::Component
    }
}

/// 产品类别（eBike 名称优先，其余按层级映射）
pub fn product_category(name: &str) -> &'static str {
    if name.contains("eBike") {
        return "Electric Bikes";
    }
    match product_level(name) {
        ProductLevel::RawMaterial => "Raw Material",
        ProductLevel::Component => "Components",
        ProductLevel::Subassembly => "Subassemblies",
        ProductLevel::FinishedProduct => "Electric Bikes",
    }
}

/// 标准工时基准因子（按层级，小时/100 件）
pub fn process_time_factor(level: ProductLevel) -> f64 {
    match level {
        ProductLevel::RawMaterial => 0.5,
        ProductLevel::Component => 1.0,
        ProductLevel::Subassembly => 1.5,
        ProductLevel::FinishedProduct => 2.5,
    }
}

/// 典型批量区间（按层级）
pub fn batch_size_range(level: ProductLevel) -> (i64, i64) {
    match level {
        ProductLevel::RawMaterial => (500, 2000),
        ProductLevel::Component => (100, 500),
        ProductLevel::Subassembly => (50, 200),
        ProductLevel::FinishedProduct => (10, 100),
    }
}

/// 兜底 BOM 行的用量区间（父项层级 -> 子项用量）
pub fn default_bom_quantity_range(level: ProductLevel) -> (i64, i64) {
    match level {
        ProductLevel::FinishedProduct => (1, 2),
        ProductLevel::Subassembly => (1, 4),
        ProductLevel::Component => (2, 10),
        ProductLevel::RawMaterial => (5, 20),
    }
}

// ==========================================
// BOM 结构表 (父项 -> (子项, 单件用量))
// ==========================================
// 成品 -> 子装配，子装配 -> 原材料；固定配方保证跨表一致
pub const BOM_STRUCTURE: &[(&str, &[(&str, f64)])] = &[
    (
        "eBike T101",
        &[
            ("Frame", 1.0),
            ("Wheel", 2.0),
            ("Battery", 1.0),
            ("Motor", 1.0),
            ("Control_Unit", 1.0),
            ("Brakes", 2.0),
            ("Seat", 1.0),
            ("Handlebar", 1.0),
        ],
    ),
    (
        "eBike T200",
        &[
            ("Frame", 1.0),
            ("Wheel", 2.0),
            ("Battery", 1.0),
            ("Motor", 1.0),
            ("Control_Unit", 1.0),
            ("Brakes", 2.0),
            ("Seat", 1.0),
            ("Handlebar", 1.0),
        ],
    ),
    (
        "eBike C150",
        &[
            ("Frame", 1.0),
            ("Wheel", 2.0),
            ("Battery", 1.0),
            ("Motor", 1.0),
            ("Control_Unit", 1.0),
            ("Brakes", 2.0),
            ("Seat", 1.0),
            ("Handlebar", 1.0),
        ],
    ),
    (
        "eBike M300",
        &[
            ("Frame", 1.0),
            ("Wheel", 2.0),
            ("Battery", 1.0),
            ("Motor", 1.0),
            ("Control_Unit", 1.0),
            ("Brakes", 2.0),
            ("Seat", 1.0),
            ("Handlebar", 1.0),
        ],
    ),
    (
        "Frame",
        &[
            ("Aluminum Tubing", 4.0),
            ("Steel Bolts", 8.0),
            ("Rubber Grips", 2.0),
            ("Dropout Hangers", 2.0),
        ],
    ),
    (
        "Wheel",
        &[
            ("Wheel Spokes", 32.0),
            ("Tire Rubber", 1.0),
            ("Rim Strips", 1.0),
            ("Valve Stems", 1.0),
            ("Ball Bearings", 2.0),
        ],
    ),
    (
        "Battery",
        &[
            ("Lithium-ion Cells", 20.0),
            ("Battery Casings", 1.0),
            ("Control Circuits", 1.0),
        ],
    ),
    (
        "Motor",
        &[
            ("Electric Motors", 1.0),
            ("Motor Magnets", 4.0),
            ("Aluminum Tubing", 1.0),
        ],
    ),
    (
        "Control_Unit",
        &[("Microcontrollers", 1.0), ("Control Circuits", 2.0)],
    ),
    (
        "Brakes",
        &[
            ("Brake Cables", 1.0),
            ("Brake Pads", 2.0),
            ("Brake_Lever", 1.0),
            ("Hydraulic Fluid", 0.1),
        ],
    ),
    (
        "Seat",
        &[
            ("Seat Padding", 1.0),
            ("Aluminum Tubing", 1.0),
            ("Steel Bolts", 4.0),
        ],
    ),
    (
        "Handlebar",
        &[
            ("Handlebar Tubing", 1.0),
            ("Rubber Grips", 2.0),
            ("Steel Bolts", 4.0),
        ],
    ),
];

/// 未被结构表覆盖的产品使用的兜底组件
pub const DEFAULT_BOM_COMPONENTS: &[&str] = &["Steel Bolts", "Aluminum Tubing", "Rubber Grips"];

// ==========================================
// 机型匹配表 (产品名称关键词 -> 机型)
// ==========================================
// 注意顺序: 更具体的关键词在前，"eBike" 兜底成品总装
const MACHINE_TYPE_KEYWORDS: &[(&str, &str)] = &[
    ("Frame", "Frame Welding"),
    ("Paint", "Paint Booth"),
    ("Wheel", "Wheel Assembly"),
    ("Battery", "Battery Assembly"),
    ("Motor", "Motor Assembly"),
    ("Control", "Motor Assembly"),
    ("eBike", "Final Assembly"),
];

/// 产品名称 -> 首选机型（无匹配返回 None，由调用方降级为随机选择）
pub fn machine_type_for_product(product_name: &str) -> Option<&'static str> {
    MACHINE_TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| product_name.contains(keyword))
        .map(|(_, machine_type)| *machine_type)
}

// ==========================================
// 库存物料分类表 (名称关键词 -> 物料类别)
// ==========================================
const INVENTORY_CATEGORY_KEYWORDS: &[(&[&str], &str)] = &[
    (&["aluminum", "steel", "rubber", "tire"], "Raw Material"),
    (
        &["circuit", "cell", "motor", "electronic", "microcontroller"],
        "Electronic Component",
    ),
    (
        &["bolt", "bearing", "spring", "cog", "chain"],
        "Mechanical Component",
    ),
    (&["assembly", "bracket", "casing"], "Assembly"),
    (&["oil", "fluid"], "MRO"),
];

/// 库存物料名称 -> 类别（无匹配返回 None，由调用方随机兜底）
pub fn inventory_category(item_name: &str) -> Option<&'static str> {
    let lower = item_name.to_lowercase();
    INVENTORY_CATEGORY_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
}

/// 长期缺货候选物料（随机选 3 项置于临界缺货状态）
pub const SHORTAGE_CANDIDATES: &[&str] = &[
    "Lithium-ion Cells",
    "Control Circuits",
    "Microcontrollers",
    "Battery Casings",
    "Derailleur Springs",
    "Dropout Hangers",
    "Electric Motors",
    "Chainring Bolts",
];

/// 关键原材料（库存不允许见底，再订货点压到很低）
pub const CRITICAL_RAW_MATERIALS: &[&str] = &["Steel Bolts", "Rubber Grips", "Aluminum Tubing"];

// ==========================================
// 缺陷分类表 (工作中心名称关键词 -> 缺陷类别)
// ==========================================

/// 工作中心名称 -> 缺陷/质检评语类别
pub fn defect_category(work_center_name: &str) -> &'static str {
    if work_center_name.contains("Frame") {
        "frame"
    } else if work_center_name.contains("Paint") {
        "paint"
    } else if work_center_name.contains("Wheel") {
        "wheels"
    } else if work_center_name.contains("Battery") || work_center_name.contains("Motor") {
        "electronics"
    } else if work_center_name.contains("Final Assembly") {
        "final_assembly"
    } else {
        "general"
    }
}

/// 缺陷类别 -> 缺陷类型池
pub fn defect_pool(category: &str) -> &'static [&'static str] {
    match category {
        "frame" => &[
            "Weld Failure",
            "Misalignment",
            "Surface Defect",
            "Frame Bend",
            "Stress Crack",
            "Threaded Insert Issue",
        ],
        "paint" => &[
            "Color Mismatch",
            "Uneven Coating",
            "Paint Run",
            "Orange Peel Texture",
            "Insufficient Coverage",
            "Clear Coat Issue",
        ],
        "wheels" => &[
            "Out of True",
            "Spoke Tension",
            "Hub Bearing Issue",
            "Rim Damage",
            "Valve Hole Misalignment",
            "Uneven Tire Seating",
        ],
        "electronics" => &[
            "Connection Issue",
            "Sensor Malfunction",
            "Battery Cell Variance",
            "Control Board Error",
            "Motor Coil Problem",
            "Waterproofing Failure",
        ],
        "final_assembly" => &[
            "Missing Component",
            "Fastener Torque",
            "Cable Routing",
            "Interface Misalignment",
            "Improper Adjustment",
            "Incomplete Assembly",
        ],
        _ => &[
            "Cosmetic Damage",
            "Noise",
            "Vibration",
            "Documentation Error",
            "Packaging Damage",
            "Specification Deviation",
        ],
    }
}

/// 工作中心名称 -> 根因池
pub fn root_cause_pool(work_center_name: &str) -> &'static [&'static str] {
    if work_center_name.contains("Assembly") {
        &[
            "Operator Error",
            "Process Variation",
            "Missing Step",
            "Incorrect Procedure",
        ]
    } else if work_center_name.contains("Fabrication") {
        &[
            "Material Defect",
            "Tool Wear",
            "Machine Calibration",
            "Process Parameter Drift",
        ]
    } else if work_center_name.contains("Production") {
        &[
            "Component Variation",
            "Design Issue",
            "Material Specification",
            "Supplier Quality",
        ]
    } else {
        &[
            "Material Defect",
            "Operator Error",
            "Machine Calibration",
            "Design Issue",
            "Process Variation",
        ]
    }
}

/// 处置措施池（按严重度）
pub fn action_pool(severity: i64) -> &'static [&'static str] {
    if severity >= 4 {
        &[
            "Scrapped",
            "Returned to Supplier",
            "Extensive Rework Required",
        ]
    } else if severity >= 3 {
        &[
            "Reworked",
            "Repaired",
            "Process Adjusted",
            "Special Inspection Implemented",
        ]
    } else {
        &[
            "Accepted with Deviation",
            "Minor Repair",
            "Adjusted Process Parameters",
        ]
    }
}

/// 缺陷位置池
pub const DEFECT_LOCATIONS: &[&str] = &[
    "Front", "Rear", "Left", "Right", "Center", "Top", "Bottom",
];

/// 工作中心质量因子（精密工序缺陷率更高，监管强的工序更低）
pub fn work_center_quality_factor(work_center_name: &str) -> f64 {
    if work_center_name.contains("Battery Production") {
        1.2
    } else if work_center_name.contains("Motor Assembly") {
        1.1
    } else if work_center_name.contains("Frame Fabrication") {
        1.05
    } else if work_center_name.contains("Final Assembly") {
        0.9
    } else if work_center_name.contains("Quality Control") {
        0.8
    } else {
        1.0
    }
}

// ==========================================
// 机台与产线常量
// ==========================================

/// 瓶颈工作中心候选（专用工序最容易成为产能瓶颈）
pub const BOTTLENECK_CANDIDATES: &[&str] =
    &["Battery Production", "Motor Assembly", "Frame Fabrication"];

/// 厂区位置池
pub const PLANT_AREAS: &[&str] = &[
    "Building A",
    "Building B",
    "Main Factory",
    "North Wing",
    "South Wing",
];

/// 机型 -> 型号池
pub fn machine_models(machine_type: &str) -> &'static [&'static str] {
    match machine_type {
        "Frame Welding" => &["W-1000", "W-2000", "W-3000"],
        "Wheel Assembly" => &["WA-500", "WA-750", "WA-1000"],
        "Paint Booth" => &["PB-200", "PB-300", "PB-500"],
        "Battery Assembly" => &["BA-100", "BA-200", "BA-300"],
        "Motor Assembly" => &["MA-500", "MA-750", "MA-1000"],
        "Final Assembly" => &["FA-100", "FA-200", "FA-300"],
        "Quality Control" => &["QC-500", "QC-750", "QC-1000"],
        "Packaging" => &["PK-100", "PK-200", "PK-300"],
        _ => &["STD-100"],
    }
}

/// 机型 -> (可动率, 性能, 质量) OEE 基线
pub fn oee_baseline(machine_type: &str) -> (f64, f64, f64) {
    match machine_type {
        "Frame Welding" => (0.85, 0.80, 0.95),
        "Wheel Assembly" => (0.88, 0.85, 0.97),
        "Paint Booth" => (0.82, 0.78, 0.94),
        "Battery Assembly" => (0.86, 0.82, 0.98),
        "Motor Assembly" => (0.87, 0.83, 0.96),
        "Final Assembly" => (0.90, 0.85, 0.98),
        "Quality Control" => (0.92, 0.88, 0.99),
        "Packaging" => (0.91, 0.86, 0.97),
        _ => (0.88, 0.82, 0.96),
    }
}

/// 机型故障倾向因子（老旧工艺更易故障）
pub fn breakdown_factor(machine_type: &str) -> f64 {
    match machine_type {
        "Frame Welding" => 1.2,
        "Battery Assembly" => 1.1,
        "Motor Assembly" => 1.05,
        "Quality Control" => 0.7,
        "Packaging" => 0.8,
        _ => 1.0,
    }
}

/// 非计划停机原因权重 (原因, 保养逾期权重, 保养正常权重)
pub const UNPLANNED_REASON_WEIGHTS: &[(&str, u32, u32)] = &[
    ("Equipment Failure", 25, 10),
    ("Power Outage", 8, 12),
    ("Material Shortage", 20, 25),
    ("Operator Absence", 10, 20),
    ("Quality Issue", 15, 18),
    ("Tool Breakage", 12, 8),
    ("Software Error", 8, 5),
    ("Safety Incident", 2, 2),
    ("Unexpected Maintenance", 15, 5),
];

/// 停机原因 -> 描述池（无专属描述的原因由调用方拼接兜底文案）
pub fn downtime_descriptions(reason: &str) -> Option<&'static [&'static str]> {
    match reason {
        "Equipment Failure" => Some(&[
            "Drive motor overheated and stopped functioning",
            "Control system failure on main unit",
            "Mechanical jam in feed mechanism",
            "Bearing failure in main drive",
            "Pneumatic system pressure loss",
        ]),
        "Power Outage" => Some(&[
            "Factory-wide power outage",
            "Electrical surge damaged circuit boards",
            "Backup generator failed to start",
            "Power fluctuation caused system reset",
            "Circuit breaker trip in work center",
        ]),
        "Scheduled Maintenance" => Some(&[
            "Routine maintenance check",
            "Annual certification and inspection",
            "Software update and calibration",
            "Preventative maintenance service",
            "Filter replacement and lubrication",
        ]),
        "Setup/Changeover" => Some(&[
            "Product changeover from previous batch",
            "Tool replacement and alignment",
            "Setup for new product specifications",
            "Jig reconfiguration for different model",
            "Program change for new product variant",
        ]),
        "Material Shortage" => Some(&[
            "Awaiting delivery of critical components",
            "Inventory depletion of necessary parts",
            "Quality hold on incoming materials",
            "Incorrect materials delivered",
            "Supply chain delay impact",
        ]),
        "Quality Issue" => Some(&[
            "Investigating abnormal defect rate",
            "Material specification deviation detected",
            "Product dimensional check failure",
            "Customer complaint investigation",
            "Calibration drift affecting quality",
        ]),
        _ => None,
    }
}

// ==========================================
// 班次与员工常量
// ==========================================

/// 固定班次表 (名称, 开始, 结束, 产能系数, 周末班)
pub const SHIFT_TABLE: &[(&str, &str, &str, f64, bool)] = &[
    ("Morning", "06:00", "14:00", 1.0, false),
    ("Afternoon", "14:00", "22:00", 0.9, false),
    ("Night", "22:00", "06:00", 0.8, false),
    ("Weekend Day", "08:00", "20:00", 0.7, true),
    ("Weekend Night", "20:00", "08:00", 0.6, true),
];

/// 岗位表 (岗位, 人数权重, 时薪加成, 技能池)
pub const ROLE_TABLE: &[(&str, u32, f64, &[&str])] = &[
    (
        "Operator",
        60,
        0.0,
        &[
            "Machine Operation",
            "Safety Procedures",
            "Quality Inspection",
            "Basic Maintenance",
            "Material Handling",
        ],
    ),
    (
        "Technician",
        20,
        5.0,
        &[
            "Machine Repair",
            "Preventative Maintenance",
            "Electrical Systems",
            "Mechanical Systems",
            "Troubleshooting",
            "Calibration",
        ],
    ),
    (
        "Quality Control",
        10,
        8.0,
        &[
            "Quality Standards",
            "Inspection Techniques",
            "Statistical Analysis",
            "Documentation",
            "Root Cause Analysis",
            "Regulatory Compliance",
        ],
    ),
    (
        "Manager",
        5,
        15.0,
        &[
            "Team Leadership",
            "Process Improvement",
            "Production Scheduling",
            "Performance Management",
            "Safety Management",
            "Lean Manufacturing",
        ],
    ),
    (
        "Engineer",
        5,
        12.0,
        &[
            "Process Design",
            "Technical Documentation",
            "Problem Solving",
            "CAD/CAM Systems",
            "Automation",
            "Industrial Engineering",
        ],
    ),
];
