use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        let i = (self.next_f64() * items.len() as f64) as usize;
        items[i.min(items.len() - 1)]
    }
}

fn write_header(sheet: &mut Worksheet, header: &[&str]) -> Result<(), XlsxError> {
    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    Ok(())
}

/// Overdue service orders. Identifiers are written as numbers, the way the
/// source spreadsheets store them.
fn service_orders(rng: &mut SimpleRng, rows: u32) -> Result<Workbook, XlsxError> {
    let services = [
        "Corte", "Religação", "Vistoria", "Troca de Hidrômetro", "Vazamento", "Ligação Nova",
    ];
    let neighborhoods = ["Centro", "Parque Piauí", "Mocambinho", "São Benedito", "Formosa"];
    let situations = ["Pendente", "Em Execução", "Programada"];
    let notes = ["cliente ausente", "imóvel fechado", "endereço não localizado", "", ""];

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_header(sheet, &[
        "Número da OS", "Matrícula", "Serviço", "Dias em Atraso", "Endereço", "Bairro",
        "Situação", "Obs Comercial",
    ])?;

    for r in 1..=rows {
        let delay = rng.gauss(30.0, 20.0).max(0.0).round();
        sheet.write_number(r, 0, 20_240_000.0 + r as f64)?;
        sheet.write_number(r, 1, 100_000.0 + (rng.next_f64() * 900_000.0).floor())?;
        sheet.write_string(r, 2, rng.pick(&services))?;
        sheet.write_number(r, 3, delay)?;
        sheet.write_string(r, 4, format!("Rua {}, {}", r % 97 + 1, r * 7 % 1000))?;
        sheet.write_string(r, 5, rng.pick(&neighborhoods))?;
        sheet.write_string(r, 6, rng.pick(&situations))?;
        let note = rng.pick(&notes);
        if !note.is_empty() {
            sheet.write_string(r, 7, note)?;
        }
    }
    Ok(workbook)
}

fn wells(rng: &mut SimpleRng, rows: u32) -> Result<Workbook, XlsxError> {
    let situations = ["ATIVO", "ATIVO", "INATIVO", "TAMPONADO"];
    let grants = ["Sim", "Não", "Solicitado"];
    let yes_no = ["Sim", "Não"];
    let pending = ["Não", "Em tramitação/análise"];
    let systems = ["Sistema Norte", "Sistema Sul", "Sistema Leste"];

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_header(sheet, &[
        "Numeração", "Locin", "Bairro", "Situação", "Sistema", "Endereço", "Processo Outorga",
        "Termo de Cessão", "Outorga em Tramitação", "Observações",
    ])?;

    for r in 1..=rows {
        sheet.write_number(r, 0, r as f64)?;
        sheet.write_string(r, 1, format!("P-{r:03}"))?;
        sheet.write_string(r, 2, rng.pick(&["Centro", "Parque Alvorada", "Cidade Nova"]))?;
        sheet.write_string(r, 3, rng.pick(&situations))?;
        sheet.write_string(r, 4, rng.pick(&systems))?;
        sheet.write_string(r, 5, format!("Av. Principal, {}", r * 13))?;
        sheet.write_string(r, 6, rng.pick(&grants))?;
        sheet.write_string(r, 7, rng.pick(&yes_no))?;
        sheet.write_string(r, 8, rng.pick(&pending))?;
        sheet.write_string(r, 9, format!("vazão {:.1} m³/h", rng.gauss(12.0, 4.0).abs()))?;
    }
    Ok(workbook)
}

fn main() -> Result<(), XlsxError> {
    let mut rng = SimpleRng::new(42);

    let orders_path = "sample_os.xlsx";
    service_orders(&mut rng, 400)?.save(orders_path)?;
    println!("Wrote 400 service orders to {orders_path}");

    let wells_path = "sample_pocos.xlsx";
    wells(&mut rng, 60)?.save(wells_path)?;
    println!("Wrote 60 wells to {wells_path}");

    Ok(())
}
